//! Codec contract tests: lossless round-trips and the documented
//! target-id boundary.

use chrono::{TimeZone, Utc};
use fanoutdb::{
    check_reserved, Activity, ActivitySerializer, AggregatedActivity,
    AggregatedActivitySerializer, FeedError, FeedItem, Serializer, Verb,
};
use serde_json::json;

fn follow() -> Verb {
    Verb::new(1, "follow")
}

fn base_activity() -> Activity {
    let t = Utc.timestamp_micros(1_500_000_000_123_456).unwrap();
    Activity::new(13, follow(), 2000).with_time(t)
}

#[test]
fn round_trip_is_field_for_field() {
    let codec = ActivitySerializer::new();
    let activity = base_activity()
        .with_target(77)
        .with_context("likes", json!(3))
        .with_context("source", json!("web"));

    let token = codec.encode(&activity.clone().into()).unwrap();
    let decoded = codec.decode(&token).unwrap();

    let FeedItem::Activity(decoded) = decoded else {
        panic!("expected an activity payload");
    };
    assert_eq!(decoded.actor_id, activity.actor_id);
    assert_eq!(decoded.verb, activity.verb);
    assert_eq!(decoded.object_id, activity.object_id);
    assert_eq!(decoded.target_id, activity.target_id);
    assert_eq!(decoded.time, activity.time);
    assert_eq!(decoded.extra_context, activity.extra_context);
}

#[test]
fn round_trip_preserves_empty_context_and_absent_target() {
    let codec = ActivitySerializer::new();
    let activity = base_activity();

    let decoded = codec
        .decode(&codec.encode(&activity.clone().into()).unwrap())
        .unwrap();
    assert_eq!(decoded, FeedItem::Activity(activity));
}

#[test]
fn target_id_zero_collapses_to_absent() {
    // documented limitation: an explicit 0 is indistinguishable from no
    // target after a round trip
    let codec = ActivitySerializer::new();
    let with_zero = base_activity().with_target(0);
    let without = base_activity();

    let token_zero = codec.encode(&with_zero.into()).unwrap();
    let token_none = codec.encode(&without.clone().into()).unwrap();
    assert_eq!(token_zero, token_none);

    let decoded = codec.decode(&token_zero).unwrap();
    assert_eq!(decoded, FeedItem::Activity(without));
}

#[test]
fn hydrated_group_encodes_identical_to_dehydrated() {
    let t = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    let activities = vec![
        Activity::new(1, follow(), 100).with_time(t),
        Activity::new(2, follow(), 101).with_time(t),
    ];
    let group = AggregatedActivity::new("follow:100", activities, t, t);
    let codec = AggregatedActivitySerializer::new();

    let from_hydrated = codec.encode(&group.clone().into()).unwrap();
    let from_dehydrated = codec
        .encode(&group.to_dehydrated().unwrap().into())
        .unwrap();
    assert_eq!(from_hydrated, from_dehydrated);
}

#[test]
fn codecs_reject_the_wrong_payload_kind() {
    let t = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    let activity = base_activity();
    let group = AggregatedActivity::new("g", vec![], t, t);

    let err = ActivitySerializer::new()
        .encode(&group.into())
        .unwrap_err();
    assert!(matches!(err, FeedError::TypeMismatch { .. }));

    let err = AggregatedActivitySerializer::new()
        .encode(&activity.into())
        .unwrap_err();
    assert!(matches!(err, FeedError::TypeMismatch { .. }));
}

#[test]
fn reserved_character_guard_names_the_offender() {
    let err = check_reserved("field,with,commas", &[',']).unwrap_err();
    match err {
        FeedError::ReservedCharacter { character, .. } => assert_eq!(character, ','),
        other => panic!("unexpected error: {other}"),
    }
}
