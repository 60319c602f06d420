use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder,
};

use super::MemberRepository;
use crate::entity::{
    member::{self, NewMember},
    team::{self, NewTeam},
};

impl MemberRepository {
    /// Inserts a team and returns it with its generated id.
    ///
    /// # Errors
    ///
    /// Propagates any database error from the insert.
    pub async fn save_team(&self, team: NewTeam) -> Result<team::Model, DbErr> {
        team::ActiveModel::from(team).insert(self.connection()).await
    }

    /// Inserts a member and returns it with its generated id.
    ///
    /// # Errors
    ///
    /// Propagates any database error from the insert, including a foreign key
    /// violation for an unknown team.
    pub async fn save(&self, member: NewMember) -> Result<member::Model, DbErr> {
        member::ActiveModel::from(member)
            .insert(self.connection())
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<member::Model>, DbErr> {
        member::Entity::find_by_id(id).one(self.connection()).await
    }

    pub async fn find_all(&self) -> Result<Vec<member::Model>, DbErr> {
        member::Entity::find()
            .order_by_asc(member::Column::Id)
            .all(self.connection())
            .await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Vec<member::Model>, DbErr> {
        member::Entity::find()
            .filter(member::Column::Username.eq(username))
            .order_by_asc(member::Column::Id)
            .all(self.connection())
            .await
    }

    /// Moves a member to another team, or out of any team with `None`.
    ///
    /// # Errors
    ///
    /// `DbErr::RecordNotFound` when no member has `member_id`.
    pub async fn change_team(
        &self,
        member_id: i32,
        team_id: Option<i32>,
    ) -> Result<member::Model, DbErr> {
        let member = self
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Member {member_id} not found")))?;
        let mut active = member.into_active_model();
        active.team_id = Set(team_id);
        active.update(self.connection()).await
    }

    /// Members of a team, through the inverse side of the relation.
    ///
    /// # Errors
    ///
    /// `DbErr::RecordNotFound` when no team has `team_id`.
    pub async fn members_of(&self, team_id: i32) -> Result<Vec<member::Model>, DbErr> {
        let team = team::Entity::find_by_id(team_id)
            .one(self.connection())
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Team {team_id} not found")))?;
        team.find_related(member::Entity)
            .order_by_asc(member::Column::Id)
            .all(self.connection())
            .await
    }
}
