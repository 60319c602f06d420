#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use member_search::{
    MemberRepository,
    entity::{
        member::{self, NewMember},
        team::{self, NewTeam},
    },
};
use sea_orm::{DatabaseConnection, DbErr};
use tower::ServiceExt;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    member_search::setup_database("sqlite::memory:").await
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    member_search::app(db)
}

/// teamA: member1 (10), member2 (20); teamB: member3 (30), member4 (40).
pub struct Fixture {
    pub team_a: team::Model,
    pub team_b: team::Model,
    pub members: Vec<member::Model>,
}

pub async fn seed_members(db: &DatabaseConnection) -> Result<Fixture, DbErr> {
    let repository = MemberRepository::new(db.clone());
    let team_a = repository.save_team(NewTeam::new("teamA")).await?;
    let team_b = repository.save_team(NewTeam::new("teamB")).await?;

    let mut members = Vec::new();
    for new_member in [
        NewMember::new("member1", 10).in_team(&team_a),
        NewMember::new("member2", 20).in_team(&team_a),
        NewMember::new("member3", 30).in_team(&team_b),
        NewMember::new("member4", 40).in_team(&team_b),
    ] {
        members.push(repository.save(new_member).await?);
    }

    Ok(Fixture {
        team_a,
        team_b,
        members,
    })
}

pub async fn setup_with_members() -> (DatabaseConnection, Fixture) {
    let db = setup_test_db()
        .await
        .expect("Failed to setup test database");
    let fixture = seed_members(&db).await.expect("Failed to seed members");
    (db, fixture)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, HeaderMap, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, headers, json)
}

pub fn usernames(rows: &[member::Model]) -> Vec<&str> {
    rows.iter()
        .map(|m| m.username.as_deref().unwrap_or("<null>"))
        .collect()
}
