//! # Query catalogue
//!
//! Worked examples of the query builder against the member/team schema:
//! single-result lookups, ordering, paging, aggregation, the different join
//! shapes, sub-queries, projections into DTOs, dynamically assembled
//! predicates, bulk statements and SQL functions.
//!
//! Every function takes the connection explicitly and returns
//! `Result<_, DbErr>`.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    FromQueryResult, JoinType, ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, RelationDef, RelationTrait, Select, Statement,
    sea_query::{
        Alias, Expr, Func, IntoCondition, NullOrdering, Query, SelectStatement, SimpleExpr,
        SubQueryStatement,
    },
};

use crate::entity::{member, team};
use crate::models::{MemberDto, UserDto};

// ----------------------------------------------------------------------------
// Single results
// ----------------------------------------------------------------------------

/// Exactly one row, otherwise `RecordNotFound` (none) or a non-unique error.
fn single<T>(mut rows: Vec<T>, what: &str) -> Result<T, DbErr> {
    match rows.len() {
        0 => Err(DbErr::RecordNotFound(format!("{what} not found"))),
        1 => Ok(rows.remove(0)),
        n => Err(DbErr::Custom(format!(
            "non-unique result: expected one {what}, found at least {n}"
        ))),
    }
}

async fn fetch_one(
    select: Select<member::Entity>,
    db: &DatabaseConnection,
) -> Result<member::Model, DbErr> {
    single(select.limit(2).all(db).await?, "Member")
}

/// Hand-written SQL with a bound parameter.
///
/// # Errors
///
/// `RecordNotFound` when nobody has that username, `DbErr::Custom` when
/// several members do.
pub async fn find_by_username_raw(
    db: &DatabaseConnection,
    username: &str,
) -> Result<member::Model, DbErr> {
    let backend = db.get_database_backend();
    let placeholder = match backend {
        DbBackend::Postgres => "$1",
        _ => "?",
    };
    let statement = Statement::from_sql_and_values(
        backend,
        format!("SELECT id, username, age, team_id FROM member WHERE username = {placeholder}"),
        [username.into()],
    );
    let rows = member::Entity::find()
        .from_raw_sql(statement)
        .all(db)
        .await?;
    single(rows, "Member")
}

pub async fn fetch_one_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<member::Model, DbErr> {
    fetch_one(
        member::Entity::find().filter(member::Column::Username.eq(username)),
        db,
    )
    .await
}

pub async fn fetch_one_by_username_and_age(
    db: &DatabaseConnection,
    username: &str,
    age: i32,
) -> Result<member::Model, DbErr> {
    fetch_one(
        member::Entity::find().filter(
            member::Column::Username
                .eq(username)
                .and(member::Column::Age.eq(age)),
        ),
        db,
    )
    .await
}

pub async fn fetch_count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    member::Entity::find().count(db).await
}

// ----------------------------------------------------------------------------
// Ordering and paging
// ----------------------------------------------------------------------------

/// Members of the given age, oldest first, then by username with unnamed
/// members last.
pub async fn sorted_by_age_desc_username_asc_nulls_last(
    db: &DatabaseConnection,
    age: i32,
) -> Result<Vec<member::Model>, DbErr> {
    member::Entity::find()
        .filter(member::Column::Age.eq(age))
        .order_by(member::Column::Age, Order::Desc)
        .order_by_with_nulls(member::Column::Username, Order::Asc, NullOrdering::Last)
        .all(db)
        .await
}

pub async fn page_by_username_desc(
    db: &DatabaseConnection,
    offset: u64,
    limit: u64,
) -> Result<Vec<member::Model>, DbErr> {
    member::Entity::find()
        .order_by_desc(member::Column::Username)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
}

/// A page of results with the paging inputs and the unpaged total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryResults<T> {
    pub results: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub async fn page_results_by_username_desc(
    db: &DatabaseConnection,
    offset: u64,
    limit: u64,
) -> Result<QueryResults<member::Model>, DbErr> {
    let results = page_by_username_desc(db, offset, limit).await?;
    let total = fetch_count(db).await?;
    Ok(QueryResults {
        results,
        total,
        offset,
        limit,
    })
}

// ----------------------------------------------------------------------------
// Aggregation
// ----------------------------------------------------------------------------

/// `count`, `sum`, `avg`, `max` and `min` over member ages. All but `count`
/// are `None` when there are no members.
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct AgeStatistics {
    pub count: i64,
    pub sum: Option<i64>,
    pub avg: Option<f64>,
    pub max: Option<i32>,
    pub min: Option<i32>,
}

fn age_column() -> Expr {
    Expr::col((member::Entity, member::Column::Age))
}

fn username_column() -> Expr {
    Expr::col((member::Entity, member::Column::Username))
}

pub async fn age_statistics(db: &DatabaseConnection) -> Result<AgeStatistics, DbErr> {
    member::Entity::find()
        .select_only()
        .expr_as(Func::count(Expr::col((member::Entity, member::Column::Id))), "count")
        .expr_as(Func::sum(age_column()), "sum")
        .expr_as(Func::avg(age_column()), "avg")
        .expr_as(Func::max(age_column()), "max")
        .expr_as(Func::min(age_column()), "min")
        .into_model::<AgeStatistics>()
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("Member statistics not found".to_string()))
}

#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct TeamAverageAge {
    pub team_name: String,
    pub average_age: f64,
}

/// Average member age per team, ordered by team name. Members without a
/// team are not counted.
pub async fn average_age_per_team(db: &DatabaseConnection) -> Result<Vec<TeamAverageAge>, DbErr> {
    member::Entity::find()
        .select_only()
        .column_as(team::Column::Name, "team_name")
        .expr_as(Func::avg(age_column()), "average_age")
        .inner_join(team::Entity)
        .group_by(team::Column::Name)
        .order_by_asc(team::Column::Name)
        .into_model::<TeamAverageAge>()
        .all(db)
        .await
}

// ----------------------------------------------------------------------------
// Joins
// ----------------------------------------------------------------------------

/// Members of the named team (inner join).
pub async fn members_of_team(
    db: &DatabaseConnection,
    team_name: &str,
) -> Result<Vec<member::Model>, DbErr> {
    member::Entity::find()
        .inner_join(team::Entity)
        .filter(team::Column::Name.eq(team_name))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
}

/// Theta join: `FROM member, team WHERE member.username = team.name`.
pub async fn theta_join_username_equals_team_name(
    db: &DatabaseConnection,
) -> Result<Vec<member::Model>, DbErr> {
    let mut select = member::Entity::find();
    QueryTrait::query(&mut select).from(team::Entity);
    select
        .filter(username_column().equals((team::Entity, team::Column::Name)))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
}

/// Every member, paired with its team only when that team has the given
/// name. The name is part of the `ON` clause, so non-matching members are
/// kept with no team.
pub async fn left_join_on_team_name(
    db: &DatabaseConnection,
    team_name: &str,
) -> Result<Vec<(member::Model, Option<team::Model>)>, DbErr> {
    let team_name = team_name.to_owned();
    let relation = member::Relation::Team
        .def()
        .on_condition(move |_member_table, team_table| {
            Expr::col((team_table, team::Column::Name))
                .eq(team_name.clone())
                .into_condition()
        });

    member::Entity::find()
        .join(JoinType::LeftJoin, relation)
        .order_by_asc(member::Column::Id)
        .select_also(team::Entity)
        .all(db)
        .await
}

/// Left join on columns with no declared relation:
/// `member.username = team.name`.
pub async fn left_join_unrelated_on_username(
    db: &DatabaseConnection,
) -> Result<Vec<(member::Model, Option<team::Model>)>, DbErr> {
    let relation: RelationDef = member::Entity::belongs_to(team::Entity)
        .from(member::Column::Username)
        .to(team::Column::Name)
        .into();

    member::Entity::find()
        .join(JoinType::LeftJoin, relation)
        .order_by_asc(member::Column::Id)
        .select_also(team::Entity)
        .all(db)
        .await
}

/// Loads only the member; its team needs a second query, see [`load_team`].
pub async fn find_without_team(
    db: &DatabaseConnection,
    username: &str,
) -> Result<member::Model, DbErr> {
    fetch_one_by_username(db, username).await
}

pub async fn load_team(
    db: &DatabaseConnection,
    member: &member::Model,
) -> Result<Option<team::Model>, DbErr> {
    member.find_related(team::Entity).one(db).await
}

/// Loads the member and its team in one joined query.
pub async fn find_with_team(
    db: &DatabaseConnection,
    username: &str,
) -> Result<(member::Model, Option<team::Model>), DbErr> {
    let rows = member::Entity::find()
        .find_also_related(team::Entity)
        .filter(member::Column::Username.eq(username))
        .limit(2)
        .all(db)
        .await?;
    single(rows, "Member")
}

// ----------------------------------------------------------------------------
// Sub-queries
// ----------------------------------------------------------------------------

fn sub_member() -> Alias {
    Alias::new("sub_member")
}

fn sub_member_age() -> Expr {
    Expr::col((sub_member(), member::Column::Age))
}

fn sub_query(statement: SelectStatement) -> SimpleExpr {
    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(statement)))
}

/// `SELECT max(sub_member.age) FROM member sub_member`
fn max_age() -> SelectStatement {
    Query::select()
        .expr(Func::max(sub_member_age()))
        .from_as(member::Entity, sub_member())
        .to_owned()
}

/// `SELECT avg(sub_member.age) FROM member sub_member`
fn avg_age() -> SelectStatement {
    Query::select()
        .expr(Func::avg(sub_member_age()))
        .from_as(member::Entity, sub_member())
        .to_owned()
}

pub async fn oldest_members(db: &DatabaseConnection) -> Result<Vec<member::Model>, DbErr> {
    member::Entity::find()
        .filter(age_column().eq(sub_query(max_age())))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
}

pub async fn members_at_least_average_age(
    db: &DatabaseConnection,
) -> Result<Vec<member::Model>, DbErr> {
    member::Entity::find()
        .filter(age_column().gte(sub_query(avg_age())))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
}

/// `age IN (SELECT age FROM member WHERE age > min_age)`
pub async fn members_with_age_in_over(
    db: &DatabaseConnection,
    min_age: i32,
) -> Result<Vec<member::Model>, DbErr> {
    let ages = Query::select()
        .expr(sub_member_age())
        .from_as(member::Entity, sub_member())
        .and_where(sub_member_age().gt(min_age))
        .to_owned();

    member::Entity::find()
        .filter(member::Column::Age.in_subquery(ages))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
}

/// Each username next to the average age of all members.
pub async fn usernames_with_average_age(
    db: &DatabaseConnection,
) -> Result<Vec<(Option<String>, f64)>, DbErr> {
    member::Entity::find()
        .select_only()
        .column(member::Column::Username)
        .expr_as(sub_query(avg_age()), "average_age")
        .order_by_asc(member::Column::Id)
        .into_tuple()
        .all(db)
        .await
}

// ----------------------------------------------------------------------------
// Projections
// ----------------------------------------------------------------------------

pub async fn usernames_and_ages(
    db: &DatabaseConnection,
) -> Result<Vec<(Option<String>, i32)>, DbErr> {
    member::Entity::find()
        .select_only()
        .column(member::Column::Username)
        .column(member::Column::Age)
        .order_by_asc(member::Column::Id)
        .into_tuple()
        .all(db)
        .await
}

pub async fn member_dtos(db: &DatabaseConnection) -> Result<Vec<MemberDto>, DbErr> {
    member::Entity::find()
        .select_only()
        .column(member::Column::Username)
        .column(member::Column::Age)
        .order_by_asc(member::Column::Id)
        .into_model::<MemberDto>()
        .all(db)
        .await
}

/// `username` projected under the DTO's field name `name`.
pub async fn user_dtos(db: &DatabaseConnection) -> Result<Vec<UserDto>, DbErr> {
    member::Entity::find()
        .select_only()
        .column_as(member::Column::Username, "name")
        .column(member::Column::Age)
        .order_by_asc(member::Column::Id)
        .into_model::<UserDto>()
        .all(db)
        .await
}

/// Every username paired with the maximum age, aliased as `age`.
pub async fn user_dtos_with_max_age(db: &DatabaseConnection) -> Result<Vec<UserDto>, DbErr> {
    member::Entity::find()
        .select_only()
        .column_as(member::Column::Username, "name")
        .expr_as(sub_query(max_age()), "age")
        .order_by_asc(member::Column::Id)
        .into_model::<UserDto>()
        .all(db)
        .await
}

// ----------------------------------------------------------------------------
// Dynamic predicates
// ----------------------------------------------------------------------------

/// Condition grown one predicate at a time.
pub async fn search_with_builder(
    db: &DatabaseConnection,
    username: Option<&str>,
    age: Option<i32>,
) -> Result<Vec<member::Model>, DbErr> {
    let mut builder = Condition::all();
    if let Some(username) = username {
        builder = builder.add(member::Column::Username.eq(username));
    }
    if let Some(age) = age {
        builder = builder.add(member::Column::Age.eq(age));
    }

    member::Entity::find()
        .filter(builder)
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
}

fn username_eq(username: Option<&str>) -> Option<SimpleExpr> {
    username.map(|username| member::Column::Username.eq(username))
}

fn age_eq(age: Option<i32>) -> Option<SimpleExpr> {
    age.map(|age| member::Column::Age.eq(age))
}

/// Both predicates combined, or nothing unless both are present.
#[must_use]
pub fn all_eq(username: Option<&str>, age: Option<i32>) -> Option<SimpleExpr> {
    username_eq(username)
        .zip(age_eq(age))
        .map(|(username, age)| username.and(age))
}

/// Where-parameters that are skipped when absent.
pub async fn search_with_where_params(
    db: &DatabaseConnection,
    username: Option<&str>,
    age: Option<i32>,
) -> Result<Vec<member::Model>, DbErr> {
    member::Entity::find()
        .filter(
            Condition::all()
                .add_option(username_eq(username))
                .add_option(age_eq(age)),
        )
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
}

/// Filters through the composed [`all_eq`] predicate.
pub async fn search_with_composed_predicate(
    db: &DatabaseConnection,
    username: Option<&str>,
    age: Option<i32>,
) -> Result<Vec<member::Model>, DbErr> {
    member::Entity::find()
        .filter(Condition::all().add_option(all_eq(username, age)))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
}

// ----------------------------------------------------------------------------
// Bulk statements
// ----------------------------------------------------------------------------

/// Renames every member younger than `age`; returns the number of rows
/// changed.
pub async fn bulk_rename_younger_than(
    db: &DatabaseConnection,
    age: i32,
    username: &str,
) -> Result<u64, DbErr> {
    let result = member::Entity::update_many()
        .col_expr(member::Column::Username, Expr::value(username))
        .filter(member::Column::Age.lt(age))
        .exec(db)
        .await?;
    tracing::debug!(rows = result.rows_affected, "bulk rename");
    Ok(result.rows_affected)
}

pub async fn bulk_multiply_age(db: &DatabaseConnection, factor: i32) -> Result<u64, DbErr> {
    let result = member::Entity::update_many()
        .col_expr(
            member::Column::Age,
            Expr::col(member::Column::Age).mul(factor),
        )
        .exec(db)
        .await?;
    tracing::debug!(rows = result.rows_affected, factor, "bulk age update");
    Ok(result.rows_affected)
}

pub async fn bulk_delete_younger_than(db: &DatabaseConnection, age: i32) -> Result<u64, DbErr> {
    let result = member::Entity::delete_many()
        .filter(member::Column::Age.lt(age))
        .exec(db)
        .await?;
    tracing::debug!(rows = result.rows_affected, "bulk delete");
    Ok(result.rows_affected)
}

// ----------------------------------------------------------------------------
// SQL functions
// ----------------------------------------------------------------------------

/// `replace(username, from, to)` for every member.
pub async fn usernames_replaced(
    db: &DatabaseConnection,
    from: &str,
    to: &str,
) -> Result<Vec<Option<String>>, DbErr> {
    let replaced = Func::cust(Alias::new("replace"))
        .arg(username_column())
        .arg(Expr::val(from))
        .arg(Expr::val(to));

    member::Entity::find()
        .select_only()
        .expr_as(replaced, "replaced")
        .order_by_asc(member::Column::Id)
        .into_tuple()
        .all(db)
        .await
}

/// Members whose username is already lowercase.
pub async fn members_with_lowercase_username(
    db: &DatabaseConnection,
) -> Result<Vec<member::Model>, DbErr> {
    member::Entity::find()
        .filter(username_column().eq(Func::lower(username_column())))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
}
