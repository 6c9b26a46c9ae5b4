use super::*;

/// Tests that alerts check the generation they were issued for.
///
/// Expected: generation 0 is stale after the first schedule, generation 1 delivers once
#[tokio::test]
async fn drops_stale_generation() {
    let setup = setup(600).await;
    let id = create_joined(&setup.registry, 3600).await;
    setup.registry.schedule(id).await.unwrap();
    let serial = setup.registry.edit_token(id).await.unwrap().serial;

    let stale = setup
        .registry
        .fire_alert(AlertTicket {
            id,
            serial,
            generation: 0,
        })
        .await;
    let current = setup
        .registry
        .fire_alert(AlertTicket {
            id,
            serial,
            generation: 1,
        })
        .await;
    let repeated = setup
        .registry
        .fire_alert(AlertTicket {
            id,
            serial,
            generation: 1,
        })
        .await;

    assert_eq!(stale, None);
    assert_eq!(current.map(|report| report.delivered), Some(1));
    assert_eq!(repeated, None);
    assert_eq!(setup.notifier.sent(), vec![(UserId::new(OWNER), id)]);
}

/// Tests that an alert for a deleted LFG does not reach the LFG now using its id.
///
/// Expected: old ticket dropped although id and generation match
#[tokio::test]
async fn drops_alert_for_replaced_lfg() {
    let setup = setup(600).await;
    let id = create_joined(&setup.registry, 3600).await;
    setup.registry.schedule(id).await.unwrap();
    let old_serial = setup.registry.edit_token(id).await.unwrap().serial;

    setup.registry.delete(id).await.unwrap();
    let reused = create_joined(&setup.registry, 3600).await;
    setup.registry.schedule(reused).await.unwrap();

    let result = setup
        .registry
        .fire_alert(AlertTicket {
            id,
            serial: old_serial,
            generation: 1,
        })
        .await;

    assert_eq!(reused, id);
    assert_eq!(result, None);
    assert!(setup.notifier.sent().is_empty());
}

/// Tests that one unreachable participant does not stop the rest.
///
/// Expected: others notified in roster order, the failure reported
#[tokio::test]
async fn continues_after_delivery_failure() {
    let setup = setup(600).await;
    let id = create_joined(&setup.registry, 3600).await;
    setup.registry.join(id, member(2)).await.unwrap();
    setup.registry.join(id, member(3)).await.unwrap();
    setup.notifier.fail_for(2);

    let report = setup.registry.alert_members(id).await.unwrap();

    assert_eq!(report.delivered, 2);
    assert_eq!(report.failed, vec![UserId::new(2)]);
    assert_eq!(
        setup.notifier.sent(),
        vec![(UserId::new(OWNER), id), (UserId::new(3), id)]
    );
}

/// Tests that alternatives are not alerted.
///
/// Expected: only participants receive the alert
#[tokio::test]
async fn alerts_participants_only() {
    let setup = setup(600).await;
    let id = create_joined(&setup.registry, 3600).await;
    setup.registry.join_as_alternative(id, member(2)).await.unwrap();

    let report = setup.registry.alert_members(id).await.unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(setup.notifier.sent(), vec![(UserId::new(OWNER), id)]);
}
