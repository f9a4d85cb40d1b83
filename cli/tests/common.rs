use std::{sync::Arc, time::Duration};

use clap::Parser;
use once_cell::sync::Lazy;
use roster_cli::{
    config::Cli,
    run_with_state,
    shared_state::{InnerState, State},
    Error,
};
use roster_store::{MemoryStore, PostgrestStore, RestConfig};

/// State backed by an in-memory store with a signed-in user.
pub fn memory_state() -> State {
    Lazy::force(&roster_test::TRACING);
    let session = roster_test::signed_in("token");
    InnerState::new(Arc::new(MemoryStore::new(session.clone())), session)
}

/// State backed by the REST store at `url`, signed in with the access token `token`.
pub fn rest_state(url: &str) -> State {
    Lazy::force(&roster_test::TRACING);
    let session = roster_test::signed_in("token");
    let config = RestConfig {
        url: url.to_string(),
        anon_key: "anon".to_string(),
        timeout: Duration::from_secs(5),
    };
    let store = PostgrestStore::new(&config, session.clone()).expect("creating store");
    InnerState::new(Arc::new(store), session)
}

/// Run a command line against `state`, answering prompts with `input`, and return what
/// the command printed.
pub async fn run(state: &State, args: &[&str], input: &str) -> Result<String, Error> {
    let cli = Cli::try_parse_from(std::iter::once("roster").chain(args.iter().copied()))
        .expect("parsing arguments");
    let mut out = Vec::new();
    let mut input = input.as_bytes();
    run_with_state(state, cli.command, &mut out, &mut input).await?;
    Ok(String::from_utf8(out).expect("output is utf-8"))
}
