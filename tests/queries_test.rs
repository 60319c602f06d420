use member_search::{
    MemberRepository,
    entity::member::NewMember,
    models::{MemberDto, UserDto},
    queries::{self, AgeStatistics, TeamAverageAge},
};
use sea_orm::DbErr;

mod common;
use common::{setup_test_db, setup_with_members, usernames};

#[tokio::test]
async fn test_fetch_one_by_username() {
    let (db, fixture) = setup_with_members().await;

    let member = queries::fetch_one_by_username(&db, "member1").await.unwrap();
    assert_eq!(member, fixture.members[0]);

    let member = queries::fetch_one_by_username_and_age(&db, "member3", 30)
        .await
        .unwrap();
    assert_eq!(member.id, fixture.members[2].id);

    let missing = queries::fetch_one_by_username_and_age(&db, "member3", 31).await;
    assert!(matches!(missing, Err(DbErr::RecordNotFound(_))));
}

#[tokio::test]
async fn test_fetch_one_rejects_duplicates() {
    let (db, _) = setup_with_members().await;
    MemberRepository::new(db.clone())
        .save(NewMember::new("member1", 99))
        .await
        .unwrap();

    let result = queries::fetch_one_by_username(&db, "member1").await;
    assert!(matches!(result, Err(DbErr::Custom(_))), "{result:?}");
}

#[tokio::test]
async fn test_find_by_username_raw_sql() {
    let (db, fixture) = setup_with_members().await;

    let member = queries::find_by_username_raw(&db, "member2").await.unwrap();
    assert_eq!(member, fixture.members[1]);

    let missing = queries::find_by_username_raw(&db, "member9").await;
    assert!(matches!(missing, Err(DbErr::RecordNotFound(_))));
}

#[tokio::test]
async fn test_fetch_count() {
    let (db, _) = setup_with_members().await;
    assert_eq!(queries::fetch_count(&db).await.unwrap(), 4);
}

#[tokio::test]
async fn test_sort_age_desc_username_nulls_last() {
    let db = setup_test_db()
        .await
        .expect("Failed to setup test database");
    let repository = MemberRepository::new(db.clone());
    for new_member in [
        NewMember::anonymous(100),
        NewMember::new("member6", 100),
        NewMember::new("member5", 100),
        NewMember::new("member7", 99),
    ] {
        repository.save(new_member).await.unwrap();
    }

    let rows = queries::sorted_by_age_desc_username_asc_nulls_last(&db, 100)
        .await
        .unwrap();
    assert_eq!(usernames(&rows), ["member5", "member6", "<null>"]);
}

#[tokio::test]
async fn test_paging_by_username_desc() {
    let (db, _) = setup_with_members().await;

    let rows = queries::page_by_username_desc(&db, 1, 2).await.unwrap();
    assert_eq!(usernames(&rows), ["member3", "member2"]);

    let results = queries::page_results_by_username_desc(&db, 1, 2)
        .await
        .unwrap();
    assert_eq!(results.total, 4);
    assert_eq!(results.offset, 1);
    assert_eq!(results.limit, 2);
    assert_eq!(results.results.len(), 2);
}

#[tokio::test]
async fn test_age_statistics() {
    let (db, _) = setup_with_members().await;

    let stats = queries::age_statistics(&db).await.unwrap();
    assert_eq!(
        stats,
        AgeStatistics {
            count: 4,
            sum: Some(100),
            avg: Some(25.0),
            max: Some(40),
            min: Some(10),
        }
    );
}

#[tokio::test]
async fn test_age_statistics_on_empty_table() {
    let db = setup_test_db()
        .await
        .expect("Failed to setup test database");

    let stats = queries::age_statistics(&db).await.unwrap();
    assert_eq!(stats.count, 0);
    assert_eq!(stats.sum, None);
    assert_eq!(stats.max, None);
}

#[tokio::test]
async fn test_average_age_per_team() {
    let (db, _) = setup_with_members().await;

    let averages = queries::average_age_per_team(&db).await.unwrap();
    assert_eq!(
        averages,
        vec![
            TeamAverageAge {
                team_name: "teamA".to_string(),
                average_age: 15.0,
            },
            TeamAverageAge {
                team_name: "teamB".to_string(),
                average_age: 35.0,
            },
        ]
    );
}

#[tokio::test]
async fn test_inner_join_by_team_name() {
    let (db, _) = setup_with_members().await;

    let rows = queries::members_of_team(&db, "teamA").await.unwrap();
    assert_eq!(usernames(&rows), ["member1", "member2"]);
}

#[tokio::test]
async fn test_theta_join() {
    let (db, _) = setup_with_members().await;
    let repository = MemberRepository::new(db.clone());
    for name in ["teamA", "teamB", "teamC"] {
        repository.save(NewMember::named(name)).await.unwrap();
    }

    let rows = queries::theta_join_username_equals_team_name(&db)
        .await
        .unwrap();
    assert_eq!(usernames(&rows), ["teamA", "teamB"]);
}

#[tokio::test]
async fn test_left_join_with_on_filter_keeps_all_members() {
    let (db, fixture) = setup_with_members().await;

    let rows = queries::left_join_on_team_name(&db, "teamA").await.unwrap();
    let pairs: Vec<_> = rows
        .iter()
        .map(|(member, team)| (member.username.as_deref(), team.as_ref().map(|t| t.id)))
        .collect();

    assert_eq!(
        pairs,
        [
            (Some("member1"), Some(fixture.team_a.id)),
            (Some("member2"), Some(fixture.team_a.id)),
            (Some("member3"), None),
            (Some("member4"), None),
        ]
    );
}

#[tokio::test]
async fn test_left_join_on_unrelated_columns() {
    let (db, _) = setup_with_members().await;
    let repository = MemberRepository::new(db.clone());
    for name in ["teamA", "teamB", "teamC"] {
        repository.save(NewMember::named(name)).await.unwrap();
    }

    let rows = queries::left_join_unrelated_on_username(&db).await.unwrap();
    assert_eq!(rows.len(), 7);

    let joined: Vec<_> = rows
        .iter()
        .filter_map(|(member, team)| Some((member.username.as_deref()?, team.as_ref()?)))
        .map(|(username, team)| (username, team.name.as_str()))
        .collect();
    assert_eq!(joined, [("teamA", "teamA"), ("teamB", "teamB")]);
}

#[tokio::test]
async fn test_team_loaded_separately_or_joined() {
    let (db, fixture) = setup_with_members().await;

    let member = queries::find_without_team(&db, "member1").await.unwrap();
    let team = queries::load_team(&db, &member).await.unwrap();
    assert_eq!(team, Some(fixture.team_a.clone()));

    let (member, team) = queries::find_with_team(&db, "member1").await.unwrap();
    assert_eq!(member, fixture.members[0]);
    assert_eq!(team, Some(fixture.team_a));
}

#[tokio::test]
async fn test_find_with_team_for_member_without_team() {
    let (db, _) = setup_with_members().await;
    MemberRepository::new(db.clone())
        .save(NewMember::new("loner", 5))
        .await
        .unwrap();

    let (member, team) = queries::find_with_team(&db, "loner").await.unwrap();
    assert_eq!(member.username.as_deref(), Some("loner"));
    assert_eq!(team, None);
}

#[tokio::test]
async fn test_sub_queries() {
    let (db, _) = setup_with_members().await;

    let oldest = queries::oldest_members(&db).await.unwrap();
    assert_eq!(oldest.iter().map(|m| m.age).collect::<Vec<_>>(), [40]);

    let older = queries::members_at_least_average_age(&db).await.unwrap();
    assert_eq!(older.iter().map(|m| m.age).collect::<Vec<_>>(), [30, 40]);

    let over_ten = queries::members_with_age_in_over(&db, 10).await.unwrap();
    assert_eq!(over_ten.iter().map(|m| m.age).collect::<Vec<_>>(), [20, 30, 40]);
}

#[tokio::test]
async fn test_select_clause_sub_query() {
    let (db, _) = setup_with_members().await;

    let rows = queries::usernames_with_average_age(&db).await.unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|(_, average)| (*average - 25.0).abs() < f64::EPSILON));
    assert_eq!(rows[0].0.as_deref(), Some("member1"));
}

#[tokio::test]
async fn test_projections() {
    let (db, _) = setup_with_members().await;

    let tuples = queries::usernames_and_ages(&db).await.unwrap();
    assert_eq!(tuples[0], (Some("member1".to_string()), 10));

    let members = queries::member_dtos(&db).await.unwrap();
    assert_eq!(
        members[3],
        MemberDto {
            username: Some("member4".to_string()),
            age: 40,
        }
    );

    let users = queries::user_dtos(&db).await.unwrap();
    assert_eq!(
        users[1],
        UserDto {
            name: Some("member2".to_string()),
            age: 20,
        }
    );

    let with_max = queries::user_dtos_with_max_age(&db).await.unwrap();
    assert_eq!(with_max.len(), 4);
    assert!(with_max.iter().all(|user| user.age == 40));
}

#[tokio::test]
async fn test_dynamic_condition_builder() {
    let (db, _) = setup_with_members().await;

    let rows = queries::search_with_builder(&db, Some("member1"), Some(10))
        .await
        .unwrap();
    assert_eq!(usernames(&rows), ["member1"]);

    let rows = queries::search_with_builder(&db, None, None).await.unwrap();
    assert_eq!(rows.len(), 4);
}

#[tokio::test]
async fn test_dynamic_where_params_skip_absent_values() {
    let (db, _) = setup_with_members().await;

    let rows = queries::search_with_where_params(&db, Some("member1"), None)
        .await
        .unwrap();
    assert_eq!(usernames(&rows), ["member1"]);

    let rows = queries::search_with_where_params(&db, None, Some(20))
        .await
        .unwrap();
    assert_eq!(usernames(&rows), ["member2"]);
}

#[tokio::test]
async fn test_composed_predicate_needs_both_values() {
    let (db, _) = setup_with_members().await;

    let rows = queries::search_with_composed_predicate(&db, Some("member1"), Some(10))
        .await
        .unwrap();
    assert_eq!(usernames(&rows), ["member1"]);

    let rows = queries::search_with_composed_predicate(&db, Some("member1"), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);

    assert!(queries::all_eq(None, Some(10)).is_none());
}

#[tokio::test]
async fn test_bulk_rename() {
    let (db, _) = setup_with_members().await;

    let changed = queries::bulk_rename_younger_than(&db, 28, "nonMember")
        .await
        .unwrap();
    assert_eq!(changed, 2);

    let rows = MemberRepository::new(db).find_all().await.unwrap();
    assert_eq!(
        usernames(&rows),
        ["nonMember", "nonMember", "member3", "member4"]
    );
}

#[tokio::test]
async fn test_bulk_multiply_age() {
    let (db, _) = setup_with_members().await;

    let changed = queries::bulk_multiply_age(&db, 2).await.unwrap();
    assert_eq!(changed, 4);

    let rows = MemberRepository::new(db).find_all().await.unwrap();
    assert_eq!(
        rows.iter().map(|m| m.age).collect::<Vec<_>>(),
        [20, 40, 60, 80]
    );
}

#[tokio::test]
async fn test_bulk_delete() {
    let (db, _) = setup_with_members().await;

    let deleted = queries::bulk_delete_younger_than(&db, 18).await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(queries::fetch_count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn test_sql_replace_function() {
    let (db, _) = setup_with_members().await;

    let replaced = queries::usernames_replaced(&db, "member", "M").await.unwrap();
    assert_eq!(
        replaced,
        [
            Some("M1".to_string()),
            Some("M2".to_string()),
            Some("M3".to_string()),
            Some("M4".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_sql_lower_function() {
    let (db, _) = setup_with_members().await;
    MemberRepository::new(db.clone())
        .save(NewMember::new("Member5", 50))
        .await
        .unwrap();

    let rows = queries::members_with_lowercase_username(&db).await.unwrap();
    assert_eq!(
        usernames(&rows),
        ["member1", "member2", "member3", "member4"]
    );
}
