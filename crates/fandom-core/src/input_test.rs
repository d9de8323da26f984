use std::collections::HashMap;
use std::env::VarError;
use std::io::Write;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn write_input(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("INPUT.json");
    let mut file = std::fs::File::create(&path).expect("create input file");
    file.write_all(body.as_bytes()).expect("write input file");
    path
}

fn missing_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("does-not-exist.json")
}

#[test]
fn file_takes_precedence_over_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, r#"{"usernames": ["from_file"], "mode": "followers"}"#);
    let mut map = HashMap::new();
    map.insert(INPUT_ENV_VAR, r#"{"usernames": ["from_env"]}"#);

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert_eq!(resolved.job.targets, vec!["from_file".to_string()]);
    assert_eq!(resolved.job.mode, Mode::Followers);
    assert_eq!(resolved.source, InputSource::File(path));
}

#[test]
fn env_is_used_when_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let mut map = HashMap::new();
    map.insert(INPUT_ENV_VAR, r#"{"usernames": ["alice", "bob"]}"#);

    let resolved = resolve_with(&missing_path(&dir), lookup_from_map(&map));

    assert_eq!(resolved.job.targets, vec!["alice", "bob"]);
    assert_eq!(resolved.job.mode, Mode::Enrich);
    assert_eq!(resolved.source, InputSource::Env);
}

#[test]
fn no_sources_yields_empty_job() {
    let dir = tempfile::tempdir().unwrap();
    let map: HashMap<&str, &str> = HashMap::new();

    let resolved = resolve_with(&missing_path(&dir), lookup_from_map(&map));

    assert_eq!(resolved.job, JobConfig::default());
    assert!(resolved.job.targets.is_empty());
    assert_eq!(resolved.job.mode, Mode::Enrich);
    assert!(resolved.job.credential.is_none());
    assert_eq!(resolved.source, InputSource::Empty);
}

#[test]
fn malformed_file_falls_back_to_empty_job() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "{ not json");
    let mut map = HashMap::new();
    map.insert(INPUT_ENV_VAR, r#"{"usernames": ["from_env"]}"#);

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert!(resolved.job.targets.is_empty());
    assert_eq!(resolved.source, InputSource::Empty);
}

#[test]
fn malformed_env_falls_back_to_empty_job() {
    let dir = tempfile::tempdir().unwrap();
    let mut map = HashMap::new();
    map.insert(INPUT_ENV_VAR, r#"{"usernames": "alice"}"#);

    let resolved = resolve_with(&missing_path(&dir), lookup_from_map(&map));

    assert_eq!(resolved.job, JobConfig::default());
    assert_eq!(resolved.source, InputSource::Empty);
}

#[test]
fn unknown_fields_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut map = HashMap::new();
    map.insert(
        INPUT_ENV_VAR,
        r#"{"usernames": ["alice"], "proxyConfiguration": {"useApifyProxy": true}}"#,
    );

    let resolved = resolve_with(&missing_path(&dir), lookup_from_map(&map));

    assert_eq!(resolved.job.targets, vec!["alice"]);
}

#[test]
fn missing_usernames_defaults_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut map = HashMap::new();
    map.insert(INPUT_ENV_VAR, r#"{"mode": "followers"}"#);

    let resolved = resolve_with(&missing_path(&dir), lookup_from_map(&map));

    assert!(resolved.job.targets.is_empty());
    assert_eq!(resolved.job.mode, Mode::Followers);
    assert_eq!(resolved.source, InputSource::Env);
}

#[test]
fn session_id_and_limit_are_mapped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(
        &dir,
        r#"{"usernames": ["alice"], "session_id": "XYZ", "limit": 25}"#,
    );
    let map: HashMap<&str, &str> = HashMap::new();

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert_eq!(resolved.job.credential.as_deref(), Some("XYZ"));
    assert_eq!(resolved.job.follower_limit, 25);
}

#[test]
fn limit_defaults_when_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, r#"{"usernames": ["alice"]}"#);
    let map: HashMap<&str, &str> = HashMap::new();

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert_eq!(resolved.job.follower_limit, DEFAULT_FOLLOWER_LIMIT);
}

#[test]
fn empty_session_id_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, r#"{"usernames": ["alice"], "session_id": ""}"#);
    let map: HashMap<&str, &str> = HashMap::new();

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert!(resolved.job.credential.is_none());
}

#[test]
fn badly_typed_limit_keeps_targets() {
    let dir = tempfile::tempdir().unwrap();
    let map: HashMap<&str, &str> = HashMap::new();

    for body in [
        r#"{"usernames": ["alice", "bob"], "limit": "50"}"#,
        r#"{"usernames": ["alice", "bob"], "limit": -1}"#,
        r#"{"usernames": ["alice", "bob"], "limit": 2.5}"#,
        r#"{"usernames": ["alice", "bob"], "limit": 99999999999}"#,
    ] {
        let path = write_input(&dir, body);
        let resolved = resolve_with(&path, lookup_from_map(&map));

        assert_eq!(
            resolved.job.targets,
            vec!["alice".to_string(), "bob".to_string()],
            "targets lost for {body}"
        );
        assert_eq!(resolved.job.follower_limit, DEFAULT_FOLLOWER_LIMIT);
        assert_eq!(resolved.source, InputSource::File(path));
    }
}

#[test]
fn null_limit_uses_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, r#"{"usernames": ["alice"], "limit": null}"#);
    let map: HashMap<&str, &str> = HashMap::new();

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert_eq!(resolved.job.targets, vec!["alice".to_string()]);
    assert_eq!(resolved.job.follower_limit, DEFAULT_FOLLOWER_LIMIT);
}

#[test]
fn non_string_session_id_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(
        &dir,
        r#"{"usernames": ["alice", "bob"], "session_id": 12345, "limit": 10}"#,
    );
    let map: HashMap<&str, &str> = HashMap::new();

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert_eq!(resolved.job.targets.len(), 2);
    assert!(resolved.job.credential.is_none());
    assert_eq!(resolved.job.follower_limit, 10);
}

#[test]
fn non_string_mode_falls_back_to_enrich() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, r#"{"usernames": ["alice"], "mode": 3}"#);
    let map: HashMap<&str, &str> = HashMap::new();

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert_eq!(resolved.job.targets, vec!["alice".to_string()]);
    assert_eq!(resolved.job.mode, Mode::Enrich);
}

#[test]
fn env_credential_is_returned_separately() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, r#"{"usernames": ["alice"]}"#);
    let mut map = HashMap::new();
    map.insert(SESSION_ENV_VAR, "ENV-SESSION");

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert!(resolved.job.credential.is_none());
    assert_eq!(resolved.env_credential.as_deref(), Some("ENV-SESSION"));
}

#[test]
fn env_credential_survives_malformed_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(&dir, "[1, 2, 3]");
    let mut map = HashMap::new();
    map.insert(SESSION_ENV_VAR, "ENV-SESSION");

    let resolved = resolve_with(&path, lookup_from_map(&map));

    assert!(resolved.job.targets.is_empty());
    assert_eq!(resolved.env_credential.as_deref(), Some("ENV-SESSION"));
}

#[test]
fn unknown_mode_falls_back_to_enrich() {
    let dir = tempfile::tempdir().unwrap();
    let mut map = HashMap::new();
    map.insert(INPUT_ENV_VAR, r#"{"usernames": ["alice"], "mode": "posts"}"#);

    let resolved = resolve_with(&missing_path(&dir), lookup_from_map(&map));

    assert_eq!(resolved.job.mode, Mode::Enrich);
    assert_eq!(resolved.job.targets, vec!["alice"]);
}

#[test]
fn usernames_are_trimmed_and_at_stripped_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut map = HashMap::new();
    map.insert(
        INPUT_ENV_VAR,
        r#"{"usernames": [" @carol ", "alice", "", "@bob"]}"#,
    );

    let resolved = resolve_with(&missing_path(&dir), lookup_from_map(&map));

    assert_eq!(resolved.job.targets, vec!["carol", "alice", "", "bob"]);
}

#[test]
fn mode_parses_case_insensitively() {
    assert_eq!("Followers".parse::<Mode>().unwrap(), Mode::Followers);
    assert_eq!(" enrich ".parse::<Mode>().unwrap(), Mode::Enrich);
    assert!(matches!(
        "scrape".parse::<Mode>(),
        Err(ConfigError::UnknownMode(ref m)) if m == "scrape"
    ));
}

#[test]
fn job_config_debug_redacts_credential() {
    let job = JobConfig {
        credential: Some("XYZ-SECRET".to_string()),
        ..JobConfig::default()
    };
    let rendered = format!("{job:?}");
    assert!(!rendered.contains("XYZ-SECRET"), "credential leaked: {rendered}");
}
