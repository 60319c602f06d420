use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(nullable)]
    pub username: Option<String>,
    pub age: i32,
    #[sea_orm(nullable)]
    pub team_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id"
    )]
    Team,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert payload for a member.
///
/// A member may be created with only a username, with a username and an age,
/// or already attached to a team through [`NewMember::in_team`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NewMember {
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i32>,
}

impl NewMember {
    #[must_use]
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            username: Some(username.into()),
            age,
            team_id: None,
        }
    }

    /// Named member aged zero.
    #[must_use]
    pub fn named(username: impl Into<String>) -> Self {
        Self::new(username, 0)
    }

    /// A member whose username is `NULL`.
    #[must_use]
    pub fn anonymous(age: i32) -> Self {
        Self {
            username: None,
            age,
            team_id: None,
        }
    }

    #[must_use]
    pub fn in_team(mut self, team: &super::team::Model) -> Self {
        self.team_id = Some(team.id);
        self
    }
}

impl From<NewMember> for ActiveModel {
    fn from(new: NewMember) -> Self {
        Self {
            username: Set(new.username),
            age: Set(new.age),
            team_id: Set(new.team_id),
            ..Default::default()
        }
    }
}
