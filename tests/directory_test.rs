mod common;

use anyhow::Result;
use common::*;
use pocketbook::application::UserDirectory;
use pocketbook::domain::User;

#[tokio::test]
async fn test_default_roster_and_selection() -> Result<()> {
    let (tracker, _temp) = test_tracker().await?;

    assert_eq!(tracker.directory.users(), User::seed_roster().as_slice());
    assert_eq!(tracker.directory.current_user().map(|u| u.id), Some(1));
    assert!(!tracker.directory.recovered_from_corrupt_state());

    Ok(())
}

#[tokio::test]
async fn test_set_current_user() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let mut tracker = tracker_with_roster(&repo, roster_ab()).await?;

    tracker.directory.set_current_user(2).await?;

    let current = tracker.directory.current_user().expect("roster is not empty");
    assert_eq!(current.id, 2);
    assert_eq!(current.name, "B");
    assert_eq!(repo.get("currentUserId").await?, Some("2".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_selection_survives_restart() -> Result<()> {
    let (mut tracker, temp) = test_tracker().await?;
    tracker.directory.set_current_user(2).await?;
    drop(tracker);

    let reopened = reopen(&temp).await?;
    assert_eq!(reopened.directory.current_user_id(), 2);
    assert_eq!(reopened.directory.current_user().map(|u| u.id), Some(2));

    Ok(())
}

#[tokio::test]
async fn test_unknown_selection_falls_back_to_first_user() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let mut tracker = tracker_with_roster(&repo, roster_ab()).await?;

    // Accepted and persisted as-is
    tracker.directory.set_current_user(99).await?;
    assert_eq!(tracker.directory.current_user_id(), 99);
    assert_eq!(repo.get("currentUserId").await?, Some("99".to_string()));

    // Resolved at read time
    assert_eq!(tracker.directory.current_user().map(|u| u.id), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_init_without_stored_selection_keeps_default() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let mut directory = UserDirectory::with_roster(repo.clone(), roster_ab());

    directory.init().await?;

    assert_eq!(directory.current_user_id(), 1);
    assert!(!directory.recovered_from_corrupt_state());
    assert_eq!(repo.get("currentUserId").await?, None);

    Ok(())
}

#[tokio::test]
async fn test_init_with_unparseable_selection_keeps_default() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    repo.set("currentUserId", "not-a-number").await?;

    let mut directory = UserDirectory::with_roster(repo.clone(), roster_ab());
    directory.init().await?;

    assert_eq!(directory.current_user_id(), 1);
    assert!(directory.recovered_from_corrupt_state());

    Ok(())
}

#[tokio::test]
async fn test_init_with_numeric_prefix_selection_is_rejected() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    repo.set("currentUserId", "2abc").await?;

    let mut directory = UserDirectory::with_roster(repo.clone(), roster_ab());
    directory.init().await?;

    // The whole value must be an integer; a leading "2" is not enough.
    assert_eq!(directory.current_user_id(), 1);
    assert!(directory.recovered_from_corrupt_state());

    Ok(())
}

#[tokio::test]
async fn test_init_with_blank_selection_keeps_default_silently() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    repo.set("currentUserId", "").await?;

    let mut directory = UserDirectory::with_roster(repo.clone(), roster_ab());
    directory.init().await?;

    assert_eq!(directory.current_user_id(), 1);
    assert!(!directory.recovered_from_corrupt_state());

    Ok(())
}

#[tokio::test]
async fn test_find_user() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    let tracker = tracker_with_roster(&repo, roster_ab()).await?;

    assert_eq!(tracker.directory.find_user(2).map(|u| u.name.as_str()), Some("B"));
    assert!(tracker.directory.find_user(3).is_none());

    Ok(())
}
