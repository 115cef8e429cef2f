//! Exercises the process-backed scorer against real `/bin/sh` children so spawn, stdin
//! hand-off, exit status handling, and process-group termination are covered end to end.
#![cfg(unix)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use scheme_advisor::config::{CacheConfig, RecommendationConfig, ScorerConfig};
use scheme_advisor::recommendation::{
    Category, GatewayError, LocalityType, ProcessScorer, Profile, RecommendationService,
    SchemeCatalog, ScorerGateway, ScoringProfile,
};

fn scoring_profile() -> ScoringProfile {
    ScoringProfile {
        age: 17,
        category: Category::St,
        annual_income: 200_000,
        state: "Bihar".to_string(),
        is_bpl: false,
    }
}

/// A killed child that has not been reaped yet still shows up as a zombie.
fn is_running(pid: &str) -> bool {
    if let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        let state = stat
            .rsplit_once(") ")
            .and_then(|(_, rest)| rest.chars().next());
        return !matches!(state, Some('Z') | Some('X'));
    }
    std::process::Command::new("kill")
        .args(["-0", pid])
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn pid_file(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("scheme-scorer-{}-{tag}.pid", std::process::id()))
}

fn read_pid(path: &std::path::Path) -> String {
    let pid = std::fs::read_to_string(path).expect("scorer wrote a pid");
    let _ = std::fs::remove_file(path);
    pid.trim().to_string()
}

async fn exits_within_five_seconds(pid: &str) -> bool {
    for _ in 0..50 {
        if !is_running(pid) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

fn shell(script: &str) -> ProcessScorer {
    ProcessScorer::new("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[tokio::test]
async fn reads_ranked_schemes_from_stdout() {
    let scorer = shell(
        r#"cat > /dev/null; printf '{"schemes":[{"name":"PM-KISAN","score":0.8,"category":"Agriculture"}]}'"#,
    );

    let schemes = scorer
        .call(&scoring_profile(), Duration::from_secs(5))
        .await
        .expect("scorer succeeds");

    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0].name, "PM-KISAN");
    assert_eq!(schemes[0].category.as_deref(), Some("Agriculture"));
}

#[tokio::test]
async fn sends_profile_payload_on_stdin() {
    // Echo the request back as a scheme name so the payload can be inspected.
    let scorer = shell(
        r#"payload=$(cat | tr -d '"{}' | tr ',' ';'); printf '{"schemes":[{"name":"%s","score":0.5}]}' "$payload""#,
    );

    let schemes = scorer
        .call(&scoring_profile(), Duration::from_secs(5))
        .await
        .expect("scorer succeeds");

    assert_eq!(
        schemes[0].name,
        "age:17;category:ST;annualIncome:200000;state:Bihar;isBPL:false"
    );
}

#[tokio::test]
async fn non_zero_exit_is_invalid_response() {
    let scorer = shell("cat > /dev/null; echo 'model load failed' >&2; exit 3");

    match scorer.call(&scoring_profile(), Duration::from_secs(5)).await {
        Err(GatewayError::InvalidResponse(reason)) => assert!(reason.contains("exit")),
        other => panic!("expected invalid response, got {other:?}"),
    }
}

#[tokio::test]
async fn closed_output_without_payload_is_invalid_response() {
    let scorer = shell("cat > /dev/null");

    assert!(matches!(
        scorer.call(&scoring_profile(), Duration::from_secs(5)).await,
        Err(GatewayError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn schema_violations_are_invalid_response() {
    let scorer = shell(r#"cat > /dev/null; printf '{"schemes":[{"name":"MUDRA","score":"high"}]}'"#);

    assert!(matches!(
        scorer.call(&scoring_profile(), Duration::from_secs(5)).await,
        Err(GatewayError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn missing_program_is_unavailable() {
    let scorer = ProcessScorer::new("/nonexistent/scheme-scorer", Vec::new());

    assert!(matches!(
        scorer.call(&scoring_profile(), Duration::from_secs(5)).await,
        Err(GatewayError::Unavailable(_))
    ));
}

#[tokio::test]
async fn slow_scorer_times_out_promptly() {
    let scorer = shell("exec sleep 30");
    let started = Instant::now();

    let result = scorer
        .call(&scoring_profile(), Duration::from_millis(200))
        .await;

    assert_eq!(result, Err(GatewayError::Timeout(Duration::from_millis(200))));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn timed_out_scorer_process_is_terminated() {
    let pid_path = pid_file("timeout");
    let scorer = shell(&format!("echo $$ > '{}'; exec sleep 30", pid_path.display()));

    let result = scorer
        .call(&scoring_profile(), Duration::from_millis(500))
        .await;
    assert!(matches!(result, Err(GatewayError::Timeout(_))));

    let pid = read_pid(&pid_path);
    assert!(
        exits_within_five_seconds(&pid).await,
        "scorer process {pid} survived the timeout"
    );
}

#[tokio::test]
async fn background_helper_does_not_hold_output_open() {
    let pid_path = pid_file("helper");
    let scorer = shell(&format!(
        r#"cat > /dev/null; sleep 30 & echo $! > '{}'; printf '{{"schemes":[]}}'"#,
        pid_path.display()
    ));
    let started = Instant::now();

    let result = scorer.call(&scoring_profile(), Duration::from_secs(5)).await;

    assert_eq!(result, Ok(Vec::new()));
    assert!(started.elapsed() < Duration::from_secs(5));
    let helper = read_pid(&pid_path);
    assert!(
        exits_within_five_seconds(&helper).await,
        "helper process {helper} outlived the scorer"
    );
}

#[tokio::test]
async fn timeout_terminates_the_whole_process_group() {
    let pid_path = pid_file("group");
    let scorer = shell(&format!(
        "sleep 30 & echo $! > '{}'; wait",
        pid_path.display()
    ));

    let result = scorer
        .call(&scoring_profile(), Duration::from_millis(500))
        .await;
    assert!(matches!(result, Err(GatewayError::Timeout(_))));

    let helper = read_pid(&pid_path);
    assert!(
        exits_within_five_seconds(&helper).await,
        "helper process {helper} survived the timeout"
    );
}

#[tokio::test]
async fn orchestrator_falls_back_when_scorer_crashes() {
    let config = RecommendationConfig {
        scorer: ScorerConfig {
            program: "/bin/sh".to_string(),
            args: vec!["-c".to_string(), "exit 1".to_string()],
            timeout: Duration::from_secs(5),
        },
        cache: CacheConfig::default(),
        catalog_path: None,
    };
    let service = RecommendationService::new(
        Arc::new(ProcessScorer::from_config(&config.scorer)),
        Arc::new(SchemeCatalog::standard()),
        &config,
    );
    let profile = Profile {
        age: Some(17),
        category: Some(Category::St),
        state: Some("Bihar".to_string()),
        locality_type: Some(LocalityType::Rural),
        annual_income: Some(200_000),
        ..Profile::default()
    };

    let result = service.recommend(&profile).await;

    assert!(result.fallback_used);
    let ids: Vec<&str> = result.schemes.iter().map(|scheme| scheme.id.0.as_str()).collect();
    assert_eq!(ids, vec!["sc-scholarship", "pmjdy", "skill-india"]);
    assert!(service.cache().is_empty());
}
