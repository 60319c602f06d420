use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, sea_query::SimpleExpr,
};

use super::MemberRepository;
use crate::entity::{member, team};
use crate::models::{MemberSearchCondition, MemberTeamDto};
use crate::pagination::{Page, Pageable};

/// Search over members left-joined with their team.
///
/// All three variants apply the same predicates: exact username, exact team
/// name, and an inclusive age range. Filters that are absent in the
/// [`MemberSearchCondition`] contribute nothing to the `WHERE` clause.
#[async_trait]
pub trait MemberSearch {
    /// Every matching row, ordered by member id.
    async fn search(
        &self,
        condition: &MemberSearchCondition,
    ) -> Result<Vec<MemberTeamDto>, sea_orm::DbErr>;

    /// One page of matching rows plus a count of all matching rows.
    async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        pageable: Pageable,
    ) -> Result<Page<MemberTeamDto>, sea_orm::DbErr>;

    /// Like [`MemberSearch::search_page_simple`], but the count query only
    /// runs when the page content does not already determine the total.
    async fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        pageable: Pageable,
    ) -> Result<Page<MemberTeamDto>, sea_orm::DbErr>;
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

fn username_eq(username: Option<&str>) -> Option<SimpleExpr> {
    username
        .filter(|username| has_text(username))
        .map(|username| member::Column::Username.eq(username))
}

fn team_name_eq(team_name: Option<&str>) -> Option<SimpleExpr> {
    team_name
        .filter(|team_name| has_text(team_name))
        .map(|team_name| team::Column::Name.eq(team_name))
}

fn age_goe(age: Option<i32>) -> Option<SimpleExpr> {
    age.map(|age| member::Column::Age.gte(age))
}

fn age_loe(age: Option<i32>) -> Option<SimpleExpr> {
    age.map(|age| member::Column::Age.lte(age))
}

/// AND of the predicates present in `condition`; empty when nothing is set.
#[must_use]
pub fn search_condition(condition: &MemberSearchCondition) -> Condition {
    Condition::all()
        .add_option(username_eq(condition.username.as_deref()))
        .add_option(team_name_eq(condition.team_name.as_deref()))
        .add_option(age_goe(condition.age_goe))
        .add_option(age_loe(condition.age_loe))
}

/// `member LEFT JOIN team` filtered by `condition`, before projection.
fn filtered(condition: &MemberSearchCondition) -> Select<member::Entity> {
    let condition = search_condition(condition);
    let select = member::Entity::find().left_join(team::Entity);
    if condition.is_empty() {
        select
    } else {
        select.filter(condition)
    }
}

/// The filtered join projected onto the [`MemberTeamDto`] columns.
#[must_use]
pub fn member_team_select(condition: &MemberSearchCondition) -> Select<member::Entity> {
    filtered(condition)
        .select_only()
        .column_as(member::Column::Id, "member_id")
        .column(member::Column::Username)
        .column(member::Column::Age)
        .column_as(team::Column::Id, "team_id")
        .column_as(team::Column::Name, "team_name")
        .order_by_asc(member::Column::Id)
}

impl MemberRepository {
    async fn fetch_page(
        &self,
        condition: &MemberSearchCondition,
        pageable: Pageable,
    ) -> Result<Vec<MemberTeamDto>, sea_orm::DbErr> {
        member_team_select(condition)
            .offset(pageable.offset())
            .limit(pageable.page_size())
            .into_model::<MemberTeamDto>()
            .all(self.connection())
            .await
    }

    async fn count_matching(&self, condition: &MemberSearchCondition) -> Result<u64, sea_orm::DbErr> {
        filtered(condition).count(self.connection()).await
    }
}

#[async_trait]
impl MemberSearch for MemberRepository {
    async fn search(
        &self,
        condition: &MemberSearchCondition,
    ) -> Result<Vec<MemberTeamDto>, sea_orm::DbErr> {
        tracing::debug!(?condition, "member search");
        member_team_select(condition)
            .into_model::<MemberTeamDto>()
            .all(self.connection())
            .await
    }

    async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        pageable: Pageable,
    ) -> Result<Page<MemberTeamDto>, sea_orm::DbErr> {
        tracing::debug!(?condition, ?pageable, "member search, counted page");
        let content = self.fetch_page(condition, pageable).await?;
        let total = self.count_matching(condition).await?;
        Ok(Page::new(content, pageable, total))
    }

    async fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        pageable: Pageable,
    ) -> Result<Page<MemberTeamDto>, sea_orm::DbErr> {
        tracing::debug!(?condition, ?pageable, "member search, lazily counted page");
        let content = self.fetch_page(condition, pageable).await?;
        Page::with_lazy_total(content, pageable, move || self.count_matching(condition)).await
    }
}
