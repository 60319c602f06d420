use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, TransactionTrait};

use crate::entity::{
    member,
    team::{self, NewTeam},
};

pub const SAMPLE_MEMBER_COUNT: i32 = 100;

/// Inserts `teamA`, `teamB` and members `member0..member99`, where member
/// `i` is `i` years old and belongs to `teamA` for even `i`, `teamB`
/// otherwise.
///
/// # Errors
///
/// Propagates database errors; nothing is inserted when one occurs.
pub async fn seed_sample_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    let team_a = team::Entity::insert(team::ActiveModel::from(NewTeam::new("teamA")))
        .exec(&txn)
        .await?
        .last_insert_id;
    let team_b = team::Entity::insert(team::ActiveModel::from(NewTeam::new("teamB")))
        .exec(&txn)
        .await?
        .last_insert_id;

    let members = (0..SAMPLE_MEMBER_COUNT).map(|i| member::ActiveModel {
        username: Set(Some(format!("member{i}"))),
        age: Set(i),
        team_id: Set(Some(if i % 2 == 0 { team_a } else { team_b })),
        ..Default::default()
    });
    member::Entity::insert_many(members).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(members = SAMPLE_MEMBER_COUNT, "seeded sample data");
    Ok(())
}
