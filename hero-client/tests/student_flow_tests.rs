
use std::time::Duration;

use hero_client::QuizTurn;
use hero_core::{HealthLogDraft, HeroError, HeroEvent, MysteryBox, QuizState, RevealStage};
use hero_types::{Action, FailureKind, Role, ValidationReason};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use test_helpers::*;

const USER: &str = "s-101";

fn setup(avatar: serde_json::Value) -> (std::sync::Arc<ScriptedGateway>, hero_client::StudentHome) {
    let gateway = ScriptedGateway::new();
    script_home(&gateway, USER, avatar);
    let home = create_test_home(gateway.clone(), create_test_account(USER, Role::Student));
    (gateway, home)
}

#[tokio::test]
async fn test_refresh_loads_every_panel() {
    let (_gateway, home) = setup(avatar_body(3, 120, 40));
    let snapshot = home.refresh().await.unwrap();

    assert_eq!(snapshot.avatar.level, 3);
    assert_eq!(snapshot.avatar.currency, 40);
    assert_eq!(snapshot.avatar.equipped_item_id, None);
    assert_eq!(snapshot.health_logs.len(), 2, "other accounts' logs are filtered out");
    assert_eq!(snapshot.box_logs[0].item_id.as_deref(), Some("2"));
    assert_eq!(snapshot.rewards.len(), 3);
    assert_eq!(home.level_progress().await.required, 300);
}

#[tokio::test]
async fn test_health_log_then_authority_levels_up() {
    let (gateway, home) = setup(avatar_body(2, 110, 0));
    gateway.respond_once(Action::GetAvatarData, avatar_body(1, 0, 0));
    gateway.respond(Action::SaveHealthLog, json!({ "success": true }));

    home.refresh().await.unwrap();
    assert_eq!(home.avatar().await.level, 1);

    let outcome = home.submit_health_log(HealthLogDraft::default()).await.unwrap();

    assert_eq!(outcome.avatar.level, 2, "level comes from the authority");
    assert_eq!(outcome.avatar.experience, 110);
    assert_eq!(home.avatar().await.level, 2);

    let saved = gateway.calls_to(Action::SaveHealthLog);
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["date"], "2026-10-18");
    assert_eq!(saved[0]["user_id"], USER);
    assert_eq!(saved[0]["sleep_hours"], 9.0);
    assert_eq!(saved[0]["mood"], "happy");
    assert!(saved[0].get("id").is_none());
}

#[tokio::test]
async fn test_second_health_log_same_day_is_refused_locally() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(
        Action::GetAllHealthLogs,
        json!({ "success": true, "data": [health_log_row(USER, "2026-10-18", "")] }),
    );

    let err = home.submit_health_log(HealthLogDraft::default()).await.unwrap_err();
    assert_eq!(err, HeroError::Validation(ValidationReason::AlreadyLoggedToday));
    assert_eq!(err.kind(), FailureKind::Validation);
    assert!(!gateway.was_called(Action::SaveHealthLog));
}

#[tokio::test]
async fn test_health_log_gate_fails_closed() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.fail_once(
        Action::GetAllHealthLogs,
        HeroError::Transport {
            action: Action::GetAllHealthLogs,
            message: "offline".to_string(),
        },
    );

    let err = home.submit_health_log(HealthLogDraft::default()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Transport);
    assert!(!gateway.was_called(Action::SaveHealthLog));
}

#[tokio::test]
async fn test_unreadable_log_date_keeps_gate_closed() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(
        Action::GetAllHealthLogs,
        json!({ "success": true, "data": [
            health_log_row(USER, "2026-10-17", ""),
            health_log_row(USER, "18/10/2569", ""),
        ]}),
    );

    let err = home.submit_health_log(HealthLogDraft::default()).await.unwrap_err();
    assert!(err.is_validation());
    assert!(!gateway.was_called(Action::SaveHealthLog));
    assert!(!home.health_log_status().await.is_open());
}

#[tokio::test]
async fn test_remote_refusal_leaves_state_untouched() {
    let (gateway, home) = setup(avatar_body(1, 30, 5));
    gateway.respond(
        Action::SaveHealthLog,
        json!({ "success": false, "message": "Already logged today" }),
    );
    home.refresh().await.unwrap();
    let before = home.snapshot().await;

    let err = home.submit_health_log(HealthLogDraft::default()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Remote);
    assert_eq!(err.user_message(), "Already logged today");
    assert_eq!(home.snapshot().await, before);
}

#[tokio::test]
async fn test_concurrent_health_logs_are_refused() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(Action::SaveHealthLog, json!({ "success": true }));
    gateway.delay(Action::GetAllHealthLogs, Duration::from_millis(50));

    let (first, second) = tokio::join!(
        home.submit_health_log(HealthLogDraft::default()),
        home.submit_health_log(HealthLogDraft::default()),
    );

    assert!(first.is_ok());
    assert!(matches!(
        second,
        Err(HeroError::Validation(ValidationReason::MutationInFlight { .. }))
    ));
    assert_eq!(gateway.calls_to(Action::SaveHealthLog).len(), 1);
}

#[tokio::test]
async fn test_mystery_box_needs_enough_coins() {
    let (gateway, home) = setup(avatar_body(1, 0, 15));
    home.refresh().await.unwrap();
    let calls_before = gateway.calls().len();

    let mut rng = StdRng::seed_from_u64(9);
    let err = home.open_mystery_box(&mut rng).await.unwrap_err();

    assert_eq!(
        err,
        HeroError::Validation(ValidationReason::InsufficientCurrency { have: 15, need: 20 })
    );
    assert_eq!(gateway.calls().len(), calls_before, "no remote call was issued");
    assert_eq!(home.avatar().await.currency, 15);
}

#[tokio::test]
async fn test_mystery_box_once_per_local_day() {
    let (gateway, home) = setup(avatar_body(1, 0, 50));
    // 01:30 on the 18th in UTC+7, still the 17th in UTC
    gateway.respond(
        Action::GetBoxLogs,
        json!({ "success": true, "logs": [["b9", USER, "2026-10-17T18:30:00.000Z", "4"]] }),
    );
    home.refresh().await.unwrap();

    let mut rng = StdRng::seed_from_u64(9);
    let err = home.open_mystery_box(&mut rng).await.unwrap_err();
    assert_eq!(err, HeroError::Validation(ValidationReason::BoxAlreadyOpenedToday));
    assert!(!gateway.was_called(Action::OpenMysteryBox));
}

#[tokio::test]
async fn test_mystery_box_draws_and_refreshes() {
    let (gateway, home) = setup(avatar_body(1, 0, 50));
    gateway.respond(Action::OpenMysteryBox, json!({ "success": true }));
    home.refresh().await.unwrap();
    gateway.respond(Action::GetAvatarData, avatar_body(1, 0, 30));

    let mut rng = StdRng::seed_from_u64(9);
    let item = home.open_mystery_box(&mut rng).await.unwrap();

    let opened = gateway.calls_to(Action::OpenMysteryBox);
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0]["itemId"], item.id.as_str());
    assert!(MysteryBox::with_default_catalog(20).find(&item.id).is_some());
    assert_eq!(home.avatar().await.currency, 30, "balance comes from the authority");
}

#[tokio::test]
async fn test_mystery_box_failure_leaves_state_untouched() {
    let failures = [
        HeroError::Remote {
            action: Action::OpenMysteryBox,
            message: "Not enough coins".to_string(),
        },
        HeroError::Timeout {
            action: Action::OpenMysteryBox,
            after: Duration::from_secs(15),
        },
    ];

    for failure in failures {
        let (gateway, mut home) = setup(avatar_body(1, 0, 50));
        let collector = EventCollector::default();
        home.add_handler(Box::new(collector.clone()));
        gateway.fail_once(Action::OpenMysteryBox, failure.clone());
        home.refresh().await.unwrap();
        let before = home.snapshot().await;

        let mut rng = StdRng::seed_from_u64(9);
        let err = home.open_mystery_box(&mut rng).await.unwrap_err();

        assert_eq!(err.kind(), failure.kind());
        let after = home.snapshot().await;
        assert_eq!(after.avatar.currency, 50);
        assert_eq!(after.items, before.items);
        assert_eq!(after.box_logs, before.box_logs);
        assert_eq!(after, before);
        assert!(!collector.has_event_type(|e| matches!(e, HeroEvent::MysteryBoxOpened { .. })));
        assert!(collector.has_event_type(
            |e| matches!(e, HeroEvent::ActionFailed { flow, .. } if flow == "mystery box")
        ));
    }
}

#[tokio::test]
async fn test_perfect_quiz_awards_card() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(
        Action::GetQuizPool,
        json!({ "success": true, "data": [quiz_question(1, 0), quiz_question(2, 1), quiz_question(3, 2)] }),
    );
    gateway.respond(Action::UpdateAvatarStats, json!({ "success": true }));
    gateway.respond(Action::AwardRandomCard, card_body("c7"));
    home.refresh().await.unwrap();

    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(home.start_quiz(&mut rng).await.unwrap(), 3);

    let mut last = None;
    for _ in 0..3 {
        let (_, question) = home.current_question().await.unwrap();
        last = Some(home.answer_question(question.correct_index as usize).await.unwrap());
    }

    let Some(QuizTurn::Finished { correct, completion, .. }) = last else {
        panic!("quiz should be finished");
    };
    assert!(correct);
    assert!(completion.result.is_perfect());
    assert_eq!(completion.result.experience, 30);

    let stats = gateway.calls_to(Action::UpdateAvatarStats);
    assert_eq!(stats[0]["expGain"], 30);
    assert!(stats[0].get("coinGain").is_none(), "the coin bonus is display only");

    let mut reveal = completion.reveal.expect("perfect session earns a card");
    assert!(reveal.is_duplicate(), "c7 was already owned");
    let start = std::time::Instant::now();
    reveal.open(start);
    assert_eq!(reveal.tick(start + Duration::from_millis(1500)), RevealStage::Revealed);
    assert_eq!(reveal.revealed().unwrap().id, "c7");

    assert!(matches!(home.quiz_state().await, QuizState::Completed(ref r) if r.card.is_some()));
}

#[tokio::test]
async fn test_imperfect_quiz_gets_no_card() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(
        Action::GetQuizPool,
        json!({ "success": true, "data": [quiz_question(1, 0), quiz_question(2, 1)] }),
    );
    gateway.respond(Action::UpdateAvatarStats, json!({ "success": true }));

    let mut rng = StdRng::seed_from_u64(1);
    home.start_quiz(&mut rng).await.unwrap();

    let (_, first) = home.current_question().await.unwrap();
    let wrong = (first.correct_index as usize + 1) % 4;
    let turn = home.answer_question(wrong).await.unwrap();
    assert!(matches!(turn, QuizTurn::NextQuestion { correct: false, next_index: 1, .. }));

    let (_, second) = home.current_question().await.unwrap();
    let turn = home.answer_question(second.correct_index as usize).await.unwrap();
    let QuizTurn::Finished { completion, .. } = turn else {
        panic!("two questions finish the session");
    };
    assert_eq!(completion.result.correct_count, 1);
    assert!(completion.reveal.is_none());

    assert!(!gateway.was_called(Action::AwardRandomCard));
    assert_eq!(gateway.calls_to(Action::UpdateAvatarStats)[0]["expGain"], 10);
}

/// Plays a full session, answering wrong only at `wrong_at`.
async fn play_session(home: &hero_client::StudentHome, wrong_at: Option<usize>) -> QuizTurn {
    let mut last = QuizTurn::Ignored;
    while let Some((index, question)) = home.current_question().await {
        let correct = question.correct_index as usize;
        let selected = if Some(index) == wrong_at { (correct + 1) % 4 } else { correct };
        last = home.answer_question(selected).await.unwrap();
        if matches!(last, QuizTurn::Finished { .. }) {
            break;
        }
    }
    last
}

fn twenty_five_questions() -> serde_json::Value {
    let pool: Vec<_> = (1..=25).map(|id| quiz_question(id, (id % 4) as u32)).collect();
    json!({ "success": true, "data": pool })
}

#[tokio::test]
async fn test_nineteen_of_twenty_earns_no_card() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(Action::GetQuizPool, twenty_five_questions());
    gateway.respond(Action::UpdateAvatarStats, json!({ "success": true }));
    gateway.respond(Action::AwardRandomCard, card_body("c9"));

    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(home.start_quiz(&mut rng).await.unwrap(), 20);

    let QuizTurn::Finished { completion, .. } = play_session(&home, Some(19)).await else {
        panic!("twenty answers finish the session");
    };
    assert_eq!(completion.result.correct_count, 19);
    assert_eq!(completion.result.session_length, 20);
    assert!(completion.reveal.is_none());
    assert!(!gateway.was_called(Action::AwardRandomCard));
    assert_eq!(gateway.calls_to(Action::UpdateAvatarStats)[0]["expGain"], 190);
}

#[tokio::test]
async fn test_twenty_of_twenty_earns_one_card() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(Action::GetQuizPool, twenty_five_questions());
    gateway.respond(Action::UpdateAvatarStats, json!({ "success": true }));
    gateway.respond(Action::AwardRandomCard, card_body("c9"));

    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(home.start_quiz(&mut rng).await.unwrap(), 20);

    let QuizTurn::Finished { completion, .. } = play_session(&home, None).await else {
        panic!("twenty answers finish the session");
    };
    assert!(completion.result.is_perfect());
    assert_eq!(gateway.calls_to(Action::AwardRandomCard).len(), 1);
    assert_eq!(gateway.calls_to(Action::UpdateAvatarStats)[0]["expGain"], 200);
    let reveal = completion.reveal.expect("perfect session earns a card");
    assert!(!reveal.is_duplicate());
}

#[tokio::test]
async fn test_quiz_report_failure_can_be_retried() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(Action::GetQuizPool, json!({ "success": true, "data": [quiz_question(1, 2)] }));
    gateway.fail_once(
        Action::UpdateAvatarStats,
        HeroError::Timeout {
            action: Action::UpdateAvatarStats,
            after: Duration::from_secs(15),
        },
    );
    gateway.respond(Action::UpdateAvatarStats, json!({ "success": true }));
    gateway.respond(Action::AwardRandomCard, card_body("c9"));

    let mut rng = StdRng::seed_from_u64(1);
    home.start_quiz(&mut rng).await.unwrap();
    let (_, question) = home.current_question().await.unwrap();
    let err = home.answer_question(question.correct_index as usize).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Timeout);

    let owed = home.pending_quiz_reward().await.expect("reward is still owed");
    assert_eq!(owed.experience, 10);
    assert!(!gateway.was_called(Action::AwardRandomCard));
    let refused = home.start_quiz(&mut rng).await.unwrap_err();
    assert!(refused.is_validation());

    let completion = home.retry_quiz_reward().await.unwrap();
    assert_eq!(gateway.calls_to(Action::UpdateAvatarStats).len(), 2);
    assert_eq!(gateway.calls_to(Action::AwardRandomCard).len(), 1);
    assert!(completion.reveal.is_some());
    assert_eq!(completion.result.card.as_ref().map(|card| card.id.as_str()), Some("c9"));
    assert!(home.pending_quiz_reward().await.is_none());

    let nothing_owed = home.retry_quiz_reward().await.unwrap_err();
    assert!(nothing_owed.is_validation());
}

#[tokio::test]
async fn test_card_award_failure_can_be_retried() {
    let (gateway, mut home) = setup(avatar_body(1, 0, 0));
    let collector = EventCollector::default();
    home.add_handler(Box::new(collector.clone()));
    gateway.respond(Action::GetQuizPool, json!({ "success": true, "data": [quiz_question(1, 2)] }));
    gateway.respond(Action::UpdateAvatarStats, json!({ "success": true }));
    gateway.fail_once(
        Action::AwardRandomCard,
        HeroError::Remote {
            action: Action::AwardRandomCard,
            message: "Card deck unavailable".to_string(),
        },
    );
    gateway.respond(Action::AwardRandomCard, card_body("c9"));

    let mut rng = StdRng::seed_from_u64(1);
    home.start_quiz(&mut rng).await.unwrap();
    let (_, question) = home.current_question().await.unwrap();
    let err = home.answer_question(question.correct_index as usize).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Remote);
    assert!(collector.has_event_type(|e| matches!(e, HeroEvent::QuizCompleted { .. })));
    assert!(home.pending_quiz_reward().await.is_some(), "the card is still owed");

    let completion = home.retry_quiz_reward().await.unwrap();
    assert_eq!(gateway.calls_to(Action::UpdateAvatarStats).len(), 1, "experience is not sent twice");
    assert_eq!(gateway.calls_to(Action::AwardRandomCard).len(), 2);
    assert_eq!(completion.result.card.as_ref().map(|card| card.id.as_str()), Some("c9"));
    assert!(collector.has_event_type(|e| matches!(e, HeroEvent::CardAwarded { .. })));
    assert!(matches!(home.quiz_state().await, QuizState::Completed(ref r) if r.card.is_some()));
}

#[tokio::test]
async fn test_empty_quiz_pool() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(Action::GetQuizPool, json!({ "success": true, "data": [] }));

    let mut rng = StdRng::seed_from_u64(1);
    let err = home.start_quiz(&mut rng).await.unwrap_err();
    assert_eq!(err, HeroError::EmptyPool);
    assert_eq!(home.quiz_state().await, QuizState::NotStarted);
}

#[tokio::test]
async fn test_redeem_reward_checks() {
    let (gateway, home) = setup(avatar_body(1, 0, 50));
    gateway.respond(Action::RedeemReward, json!({ "success": true, "code": 48213 }));
    home.refresh().await.unwrap();

    let out_of_stock = home.redeem_reward("r2").await.unwrap_err();
    assert!(matches!(
        out_of_stock,
        HeroError::Validation(ValidationReason::OutOfStock { .. })
    ));

    let too_expensive = home.redeem_reward("r3").await.unwrap_err();
    assert!(matches!(
        too_expensive,
        HeroError::Validation(ValidationReason::InsufficientCurrency { have: 50, need: 200 })
    ));
    assert!(!gateway.was_called(Action::RedeemReward));

    let code = home.redeem_reward("r1").await.unwrap();
    assert_eq!(code, "48213");
    let redeemed = gateway.calls_to(Action::RedeemReward);
    assert_eq!(redeemed[0]["rewardId"], "r1");
    assert_eq!(redeemed[0]["cost"], 10);
}

#[tokio::test]
async fn test_equip_toggles_and_requires_ownership() {
    let (gateway, home) = setup(json!({
        "success": true, "level": 1, "exp": 0, "coin": 0,
        "equipped_item_id": 3, "streak_count": 0, "base_emoji": "🦊"
    }));
    gateway.respond(Action::EquipItem, json!({ "success": true }));
    home.refresh().await.unwrap();

    let err = home.equip_item("4").await.unwrap_err();
    assert!(matches!(err, HeroError::Validation(ValidationReason::ItemNotOwned { .. })));
    assert!(!gateway.was_called(Action::EquipItem));

    home.equip_item("3").await.unwrap();
    home.equip_item("5").await.unwrap();

    let equips = gateway.calls_to(Action::EquipItem);
    assert_eq!(equips[0]["itemId"], "", "tapping the worn item unequips it");
    assert_eq!(equips[1]["itemId"], "5");
}

#[tokio::test]
async fn test_unknown_appearance_is_refused() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    let err = home.change_base_appearance("🍕").await.unwrap_err();
    assert!(err.is_validation());
    assert!(!gateway.was_called(Action::UpdateBaseEmoji));

    gateway.respond(Action::UpdateBaseEmoji, json!({ "success": true }));
    home.change_base_appearance("🐼").await.unwrap();
    assert_eq!(gateway.calls_to(Action::UpdateBaseEmoji)[0]["emoji"], "🐼");
}

#[tokio::test]
async fn test_leaderboard_keeps_server_order() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(
        Action::GetLeaderboardData,
        json!({ "success": true, "data": [
            { "user_id": "a", "fullname": "A", "class": "P4/1", "level": 5, "exp": 10, "base_emoji": "🦁" },
            { "user_id": "b", "fullname": "B", "class": "P4/1", "level": 4, "exp": 90, "base_emoji": "🐯" },
            { "user_id": USER, "fullname": "Me", "class": "P4/1", "level": 4, "exp": 20, "base_emoji": "🦊" },
            { "user_id": "d", "fullname": "D", "class": "P4/1", "level": 1, "exp": 0, "base_emoji": "🐸" },
        ]}),
    );

    let board = home.class_leaderboard().await.unwrap();
    assert_eq!(gateway.calls_to(Action::GetLeaderboardData)[0]["className"], "P4/1");
    assert_eq!(board.podium().len(), 3);
    assert_eq!(board.rest()[0].row.user_id, "d");
    assert_eq!(board.rank_of(&USER.to_string()), Some(3));
}

#[tokio::test]
async fn test_teardown_cancels_pending_calls() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(Action::GetFriends, json!({ "success": true, "friends": [] }));
    gateway.delay(Action::GetFriends, Duration::from_secs(5));

    let (result, _) = tokio::join!(home.friends(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        home.teardown();
    });

    assert!(matches!(result, Err(HeroError::Cancelled { action: Action::GetFriends })));
    assert!(home.is_torn_down());
}

#[tokio::test]
async fn test_events_published() {
    let (gateway, mut home) = setup(avatar_body(1, 0, 0));
    let collector = EventCollector::default();
    home.add_handler(Box::new(collector.clone()));
    gateway.respond(Action::SaveHealthLog, json!({ "success": true }));

    home.submit_health_log(HealthLogDraft::default()).await.unwrap();

    assert!(collector.has_event_type(|e| matches!(e, HeroEvent::HealthLogged { .. })));
    assert!(collector.has_event_type(|e| matches!(e, HeroEvent::AvatarRefreshed { .. })));
}

#[tokio::test]
async fn test_failures_are_published() {
    let (_gateway, mut home) = setup(avatar_body(1, 0, 0));
    let collector = EventCollector::default();
    home.add_handler(Box::new(collector.clone()));

    home.change_base_appearance("🍕").await.unwrap_err();

    let events = collector.get_events();
    assert!(matches!(
        &events[0],
        HeroEvent::ActionFailed { flow, kind: FailureKind::Validation, .. } if flow == "change appearance"
    ));
}

#[tokio::test]
async fn test_social_inbox() {
    let (gateway, home) = setup(avatar_body(1, 0, 0));
    gateway.respond(
        Action::GetSocialActions,
        json!({ "success": true, "actions": [
            { "id": 1, "from_user_id": "a", "to_user_id": USER, "action_type": "heart", "is_read": false },
            { "id": 2, "from_user_id": "b", "to_user_id": USER, "action_type": "sticker", "content": "🌟", "is_read": "TRUE" },
            { "id": 3, "from_user_id": USER, "to_user_id": "a", "action_type": "sticker", "content": "🎉" },
        ]}),
    );
    gateway.respond(Action::SendSocialAction, json!({ "success": true }));

    let inbox = home.inbox().await.unwrap();
    assert_eq!(inbox.actions.len(), 3);
    assert_eq!(inbox.unread, 1);

    home.send_heart("a").await.unwrap();
    let sent = gateway.calls_to(Action::SendSocialAction);
    assert_eq!(sent[0]["action_type"], "heart");
    assert_eq!(sent[0]["from_user_id"], USER);
}
