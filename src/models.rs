use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use utoipa::{IntoParams, ToSchema};

/// Optional filters of the member search.
///
/// Every field is independent: an absent field adds no predicate to the
/// query. Empty query values (`?username=`) deserialize as absent, and the
/// string filters are also skipped when they hold only whitespace.
///
/// ```text
/// GET /v1/members?teamName=teamB&ageGoe=31&ageLoe=40
/// ```
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, IntoParams, ToSchema)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MemberSearchCondition {
    /// Exact username match.
    #[serde_as(as = "NoneAsEmptyString")]
    #[param(example = "member1")]
    pub username: Option<String>,
    /// Exact team name match.
    #[serde_as(as = "NoneAsEmptyString")]
    #[param(example = "teamA")]
    pub team_name: Option<String>,
    /// Inclusive lower bound on age.
    #[serde_as(as = "NoneAsEmptyString")]
    #[param(example = 10)]
    pub age_goe: Option<i32>,
    /// Inclusive upper bound on age.
    #[serde_as(as = "NoneAsEmptyString")]
    #[param(example = 40)]
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    #[must_use]
    pub const fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    #[must_use]
    pub const fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }
}

/// Member row left-joined with its team. Team fields are `None` for members
/// without a team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: i32,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i32>,
    pub team_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i32,
}

/// Same columns as [`MemberDto`], with `username` projected as `name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct UserDto {
    pub name: Option<String>,
    pub age: i32,
}
