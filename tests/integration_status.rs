//! End-to-end status behavior over a scripted tool: the status+info
//! join, the unmanaged-path prefilter and the short-circuit rules.

mod common;

use common::{RecordingListener, ScriptedRunner};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use svncmd::domain::{NodeKind, StatusKind};
use svncmd::{SvnClient, SvnConfig};
use tempfile::TempDir;

/// A fake working copy: a directory containing a `.svn` marker.
fn fake_working_copy() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(".svn")).unwrap();
    dir
}

fn client_with(runner: Arc<ScriptedRunner>) -> SvnClient {
    SvnClient::with_runner(SvnConfig::new(), runner)
}

#[tokio::test]
async fn test_status_joins_status_and_info_per_path() {
    common::init_tracing();
    let wc = fake_working_copy();
    let file_a = wc.path().join("a.c");
    let file_b = wc.path().join("b.c");
    fs::write(&file_a, "int a;").unwrap();
    fs::write(&file_b, "int b;").unwrap();

    let runner = Arc::new(ScriptedRunner::new());
    let line_a = format!("M               6        5 alice        {}", file_a.display());
    let line_b = format!("                6        6 bob          {}", file_b.display());
    runner.push_ok("status", &format!("{line_a}\n{line_b}\n"));
    runner.push_ok(
        "info",
        &format!(
            "Path: {}\n\
             URL: svn://host/repo/trunk/a.c\n\
             Repository Root: svn://host/repo\n\
             Revision: 6\n\
             Node Kind: file\n\
             Schedule: normal\n\
             Last Changed Author: alice\n\
             Last Changed Rev: 5\n\
             Last Changed Date: 2006-03-21 14:53:24 +0100 (Tue, 21 Mar 2006)\n\
             \n\
             Path: {}\n\
             URL: svn://host/repo/trunk/b.c\n\
             Revision: 6\n\
             Node Kind: file\n\
             Schedule: normal\n\
             Last Changed Author: bob\n\
             Last Changed Rev: 6\n",
            file_a.display(),
            file_b.display()
        ),
    );

    let client = client_with(runner.clone());
    let statuses = client
        .get_status(&[file_a.as_path(), file_b.as_path()])
        .await
        .unwrap();

    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].text_status(), StatusKind::Modified);
    assert_eq!(statuses[0].revision(), Some(6));
    assert_eq!(
        statuses[0].url().unwrap().to_string(),
        "svn://host/repo/trunk/a.c"
    );
    assert_eq!(statuses[0].node_kind(), NodeKind::File);

    assert_eq!(statuses[1].text_status(), StatusKind::Normal);
    assert_eq!(
        statuses[1].url().unwrap().to_string(),
        "svn://host/repo/trunk/b.c"
    );

    // One status and one info invocation, in that order.
    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0][0], "status");
    assert!(calls[0].contains(&"-v".to_string()));
    assert!(calls[0].contains(&"--no-ignore".to_string()));
    assert!(calls[0].contains(&"--non-interactive".to_string()));
    assert_eq!(calls[1][0], "info");
}

#[tokio::test]
async fn test_paths_outside_any_working_copy_never_reach_the_tool() {
    let wc = fake_working_copy();
    let managed = wc.path().join("tracked.c");
    fs::write(&managed, "x").unwrap();

    let plain = tempfile::tempdir().unwrap();
    let unmanaged = plain.path().join("loose.txt");
    fs::write(&unmanaged, "y").unwrap();

    let runner = Arc::new(ScriptedRunner::new());
    runner.push_ok(
        "status",
        &format!(
            "                6        6 alice        {}\n",
            managed.display()
        ),
    );
    runner.push_ok(
        "info",
        &format!(
            "Path: {}\nURL: svn://host/repo/trunk/tracked.c\nRevision: 6\nNode Kind: file\n",
            managed.display()
        ),
    );

    let client = client_with(runner.clone());
    let statuses = client
        .get_status(&[unmanaged.as_path(), managed.as_path()])
        .await
        .unwrap();

    // Input order preserved: the unmanaged path first.
    assert_eq!(statuses.len(), 2);
    assert!(!statuses[0].is_managed());
    assert_eq!(statuses[0].text_status(), StatusKind::Unversioned);
    assert_eq!(statuses[0].revision(), None);
    assert_eq!(statuses[0].url(), None);
    assert!(statuses[1].is_managed());

    // The loose path was filtered out before invocation.
    for call in runner.calls() {
        assert!(
            !call.iter().any(|arg| arg.contains("loose.txt")),
            "unmanaged path leaked into {call:?}"
        );
    }
}

#[tokio::test]
async fn test_empty_path_set_short_circuits() {
    let runner = Arc::new(ScriptedRunner::new());
    let client = client_with(runner.clone());
    let statuses = client.get_status(&[]).await.unwrap();
    assert!(statuses.is_empty());
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_not_working_copy_downgrades_to_unmanaged() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.push_err(
        "status",
        1,
        "svn: '/data/checkout' is not a working copy",
    );

    let client = client_with(runner);
    let statuses = client
        .get_status_tree(Path::new("/data/checkout"), true, true)
        .await
        .unwrap();

    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].text_status(), StatusKind::Unversioned);
    assert_eq!(statuses[0].revision(), None);
}

#[tokio::test]
async fn test_update_notifies_listeners_and_returns_revision() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.push_ok(
        "up",
        "U  src/main.c\nA  src/new.c\nnot a progress line at all\nUpdated to revision 42.\n",
    );

    let client = client_with(runner);
    let listener = Arc::new(RecordingListener::new());
    client.add_notify_listener(listener.clone());

    let revision = client.update(Path::new("wc"), None).await.unwrap();
    assert_eq!(revision, Some(42));

    // Two well-formed progress tuples notified, the malformed line
    // skipped without failing the call.
    assert_eq!(listener.notified_paths().len(), 2);
    assert_eq!(listener.revisions_seen(), vec![42]);
    assert_eq!(
        listener.completed.lock().unwrap().last().unwrap(),
        "Updated to revision 42."
    );
    // The executed command line was reported up front.
    assert!(listener.command_lines.lock().unwrap()[0].starts_with("svn up"));
}

#[tokio::test]
async fn test_info_many_short_circuits_on_empty_targets() {
    let runner = Arc::new(ScriptedRunner::new());
    let client = client_with(runner.clone());
    let infos = client.get_info_many(&[]).await.unwrap();
    assert!(infos.is_empty());
    assert_eq!(runner.call_count(), 0);
}
