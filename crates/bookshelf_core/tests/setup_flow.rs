use bookshelf_core::setup::{establish_store, ConnectionFailure, SetupPrompt};
use bookshelf_core::{ConfigProvider, ConnectionConfig, FileConfigProvider};
use tempfile::tempdir;

fn creds(host: &str) -> ConnectionConfig {
    ConnectionConfig {
        username: "root".to_string(),
        password: "secret".to_string(),
        host: host.to_string(),
    }
}

/// Prompt driven by a pre-written script, recording what it was shown.
struct ScriptedPrompt {
    entries: Vec<Option<ConnectionConfig>>,
    retry_answers: Vec<bool>,
    seen_prefills: Vec<Option<ConnectionConfig>>,
    failures_seen: usize,
}

impl ScriptedPrompt {
    fn new(entries: Vec<Option<ConnectionConfig>>, retry_answers: Vec<bool>) -> Self {
        Self {
            entries,
            retry_answers,
            seen_prefills: Vec::new(),
            failures_seen: 0,
        }
    }
}

impl SetupPrompt for ScriptedPrompt {
    fn request_credentials(
        &mut self,
        previous: Option<&ConnectionConfig>,
    ) -> Option<ConnectionConfig> {
        self.seen_prefills.push(previous.cloned());
        if self.entries.is_empty() {
            panic!("prompt asked for more entries than scripted");
        }
        self.entries.remove(0)
    }

    fn confirm_retry(&mut self, _failure: &ConnectionFailure) -> bool {
        self.failures_seen += 1;
        if self.retry_answers.is_empty() {
            panic!("prompt asked for more retry answers than scripted");
        }
        self.retry_answers.remove(0)
    }
}

fn refused(host: &str) -> ConnectionFailure {
    ConnectionFailure::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        format!("{host} refused the connection"),
    ))
}

#[test]
fn cancelling_the_prompt_aborts_without_connecting() {
    let dir = tempdir().unwrap();
    let provider = FileConfigProvider::new(dir.path().join("conn.toml"));
    let mut prompt = ScriptedPrompt::new(vec![None], vec![]);

    let mut attempts = 0;
    let result = establish_store(&mut prompt, &provider, |_: &ConnectionConfig| {
        attempts += 1;
        Ok::<_, ConnectionFailure>("store")
    })
    .unwrap();

    assert!(result.is_none());
    assert_eq!(attempts, 0);
    assert_eq!(provider.load().unwrap(), None);
}

#[test]
fn successful_entry_saves_config_and_returns_the_store() {
    let dir = tempdir().unwrap();
    let provider = FileConfigProvider::new(dir.path().join("conn.toml"));
    let mut prompt = ScriptedPrompt::new(vec![Some(creds("db-host"))], vec![]);

    let result = establish_store(&mut prompt, &provider, |config| {
        Ok::<_, ConnectionFailure>(config.host.clone())
    })
    .unwrap();

    assert_eq!(result.as_deref(), Some("db-host"));
    assert_eq!(provider.load().unwrap(), Some(creds("db-host")));
}

#[test]
fn declining_a_retry_aborts_the_session() {
    let dir = tempdir().unwrap();
    let provider = FileConfigProvider::new(dir.path().join("conn.toml"));
    let mut prompt = ScriptedPrompt::new(vec![Some(creds("down-host"))], vec![false]);

    let result = establish_store(&mut prompt, &provider, |config| {
        Err::<(), _>(refused(&config.host))
    })
    .unwrap();

    assert!(result.is_none());
    assert_eq!(prompt.failures_seen, 1);
    // Accepted credentials were saved before the failed attempt.
    assert_eq!(provider.load().unwrap(), Some(creds("down-host")));
}

#[test]
fn retrying_after_a_failure_can_succeed() {
    let dir = tempdir().unwrap();
    let provider = FileConfigProvider::new(dir.path().join("conn.toml"));
    let mut prompt = ScriptedPrompt::new(
        vec![Some(creds("down-host")), Some(creds("up-host"))],
        vec![true],
    );

    let result = establish_store(&mut prompt, &provider, |config| {
        if config.host == "up-host" {
            Ok(config.host.clone())
        } else {
            Err(refused(&config.host))
        }
    })
    .unwrap();

    assert_eq!(result.as_deref(), Some("up-host"));
    assert_eq!(prompt.failures_seen, 1);
    // The failed entry became the prefill for the second attempt.
    assert_eq!(prompt.seen_prefills.len(), 2);
    assert_eq!(prompt.seen_prefills[1], Some(creds("down-host")));
    // The winning entry is what ends up on disk.
    assert_eq!(provider.load().unwrap(), Some(creds("up-host")));
}

#[test]
fn existing_config_prefills_the_first_prompt() {
    let dir = tempdir().unwrap();
    let provider = FileConfigProvider::new(dir.path().join("conn.toml"));
    provider.save(&creds("saved-host")).unwrap();

    let mut prompt = ScriptedPrompt::new(vec![None], vec![]);
    let result = establish_store(&mut prompt, &provider, |_: &ConnectionConfig| {
        Ok::<_, ConnectionFailure>(())
    })
    .unwrap();

    assert!(result.is_none());
    assert_eq!(prompt.seen_prefills, vec![Some(creds("saved-host"))]);
}
