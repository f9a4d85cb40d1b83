use assert_matches::assert_matches;
use roster_cli::{error::NAMES_REQUIRED, Error};

use crate::common::{memory_state, run};

fn player_id(line: &str) -> String {
    line.split('\t').next().unwrap().to_string()
}

#[tokio::test]
async fn add_list_edit() {
    let state = memory_state();
    run(&state, &["teams", "create", "Eagles"], "").await.unwrap();

    let added = run(
        &state,
        &[
            "players",
            "add",
            "-t",
            "Eagles",
            "--first-name",
            " Jane ",
            "--last-name",
            "Doe",
            "--position",
            "Verteidigerin",
            "--jersey-number",
            "4",
        ],
        "",
    )
    .await
    .unwrap();
    assert!(added.ends_with("\t4\tJane Doe\tVerteidiger*in\n"));

    run(
        &state,
        &[
            "players",
            "add",
            "-t",
            "eagles",
            "--first-name",
            "Max",
            "--last-name",
            "Muster",
        ],
        "",
    )
    .await
    .unwrap();

    let list = run(&state, &["players", "list", "-t", "eagles"], "")
        .await
        .unwrap();
    let lines = list.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("\t4\tJane Doe\tVerteidiger*in"));
    assert!(lines[1].ends_with("\t\tMax Muster\tPosition nicht gewählt"));

    let id = player_id(lines[1]);
    let edited = run(
        &state,
        &["players", "edit", &id, "--position", "5", "--jersey-number", "1"],
        "",
    )
    .await
    .unwrap();
    assert!(edited.ends_with("\t1\tMax Muster\tGoali\n"));

    let list = run(&state, &["players", "list", "-t", "eagles"], "")
        .await
        .unwrap();
    assert!(list.starts_with(&id));
}

#[tokio::test]
async fn names_required() {
    let state = memory_state();
    run(&state, &["teams", "create", "Eagles"], "").await.unwrap();

    let err = run(
        &state,
        &["players", "add", "-t", "eagles", "--first-name", "Jane"],
        "",
    )
    .await
    .expect_err("missing last name");
    assert_matches!(err, Error::Validation(NAMES_REQUIRED));
    assert_eq!(err.user_message(), NAMES_REQUIRED);
}

#[tokio::test]
async fn delete_player() {
    let state = memory_state();
    run(&state, &["teams", "create", "Eagles"], "").await.unwrap();
    let added = run(
        &state,
        &[
            "players",
            "add",
            "-t",
            "eagles",
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
        ],
        "",
    )
    .await
    .unwrap();
    let id = player_id(&added);

    let out = run(&state, &["players", "delete", &id], "y\n")
        .await
        .unwrap();
    assert!(out.starts_with(
        "Spieler*in löschen\nMöchten Sie Jane Doe wirklich aus dem Team entfernen? [y/N] "
    ));
    assert!(out.ends_with("Jane Doe gelöscht\n"));

    let err = run(&state, &["players", "delete", &id, "--yes"], "")
        .await
        .expect_err("already deleted");
    assert_eq!(err.error_kind(), "not_found");
}
