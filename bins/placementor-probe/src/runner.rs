/// Suite Orchestrator - Fixed-Order Check Execution
///
/// **Core Responsibility:**
/// Run every endpoint check in dependency order, thread extracted
/// identifiers from producers to consumers, and aggregate a SuiteRun.
///
/// **Dependency Rules:**
/// - Checks with no dependencies are always attempted, whatever happened
///   before them
/// - A consumer whose producer failed (or yielded no usable value) is
///   recorded as DependencyUnmet naming the missing value; its request
///   is never issued
/// - No failure escapes a check boundary; the run always completes
///
/// **Execution Model:**
/// Fully sequential. Each call blocks until response or per-call
/// timeout; there is no retry and no shared mutable state beyond the
/// SuiteRun accumulator.
use std::time::{Duration, Instant};

use placementor_common::config::ProbeConfig;
use placementor_common::signature::{mock_payment_id, payment_signature};
use placementor_common::types::{CheckResult, CheckStatus, SuiteRun};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::checks::{self, CheckEval, OrderExpectations};
use crate::client::{ApiClient, ApiResponse, CallError};
use crate::fixtures;

/// Per-call timeouts. Simple reads answer fast; upload and payment
/// calls touch storage; analysis invokes the AI backend.
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(60);
const PAYMENT_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn run_suite(config: &ProbeConfig, client: &ApiClient) -> SuiteRun {
    let mut run = SuiteRun::new();
    let user_id = Uuid::new_v4().to_string();

    println!("→ Probing {}", config.base_url);
    println!("  Test user: {user_id}");
    println!();

    // 1. Health check (no deps)
    let (outcome, elapsed_ms) = timed(client.get("/health", READ_TIMEOUT)).await;
    let eval = judge(outcome, checks::check_health);
    record(&mut run, "Health Check", eval, elapsed_ms);

    // 2. Role listing (no deps) → role id
    let (outcome, elapsed_ms) = timed(client.get("/roles", READ_TIMEOUT)).await;
    let eval = judge(outcome, |status, body| {
        checks::check_roles(status, body, config.min_roles)
    });
    let role_id = record(&mut run, "List Roles", eval, elapsed_ms);

    // 3. Resume upload (no deps) → resume id
    let resume_id = match resume_form(&user_id) {
        Ok(form) => {
            let (outcome, elapsed_ms) =
                timed(client.post_multipart("/upload-resume", form, UPLOAD_TIMEOUT)).await;
            let eval = judge(outcome, checks::check_upload);
            record(&mut run, "Upload Resume", eval, elapsed_ms)
        }
        Err(error) => {
            let eval = CheckEval::failed(
                CheckStatus::NetworkError,
                format!("could not encode multipart body: {error}"),
            );
            record(&mut run, "Upload Resume", eval, 0)
        }
    };

    // 4. Analysis (needs resume id + role id) → analysis id
    let analysis_id = match (&resume_id, &role_id) {
        (Some(resume), Some(role)) => {
            let payload = json!({
                "resumeId": resume,
                "userId": user_id,
                "role": role,
            });
            let (outcome, elapsed_ms) =
                timed(client.post_json("/analyze", &payload, ANALYZE_TIMEOUT)).await;
            let eval = judge(outcome, checks::check_analysis);
            record(&mut run, "Analyze Resume", eval, elapsed_ms)
        }
        (None, _) => dependency_unmet(&mut run, "Analyze Resume", "resume id"),
        (_, None) => dependency_unmet(&mut run, "Analyze Resume", "role id"),
    };

    // 5. Analysis listing (no deps; attempted even after failures)
    let (outcome, elapsed_ms) = timed(client.get_query(
        "/analyses",
        &[("userId", user_id.as_str())],
        READ_TIMEOUT,
    ))
    .await;
    let eval = judge(outcome, checks::check_analyses_list);
    record(&mut run, "List Analyses", eval, elapsed_ms);

    // 6. Single-analysis fetch (needs analysis id)
    match &analysis_id {
        Some(analysis) => {
            let (outcome, elapsed_ms) =
                timed(client.get(&format!("/analysis/{analysis}"), READ_TIMEOUT)).await;
            let eval = judge(outcome, |status, body| {
                checks::check_single_analysis(status, body, analysis)
            });
            record(&mut run, "Fetch Analysis", eval, elapsed_ms);
        }
        None => {
            dependency_unmet(&mut run, "Fetch Analysis", "analysis id");
        }
    }

    // 7. Order creation (needs analysis id) → order id
    let order_id = match &analysis_id {
        Some(analysis) => {
            let payload = json!({
                "analysisId": analysis,
                "userId": user_id,
                "userEmail": config.user_email,
            });
            let (outcome, elapsed_ms) =
                timed(client.post_json("/create-order", &payload, PAYMENT_TIMEOUT)).await;
            let expect = OrderExpectations {
                amount: config.expected_amount,
                currency: &config.expected_currency,
                key_id: &config.razorpay_key_id,
            };
            let eval = judge(outcome, |status, body| {
                checks::check_order(status, body, &expect)
            });
            record(&mut run, "Create Order", eval, elapsed_ms)
        }
        None => dependency_unmet(&mut run, "Create Order", "analysis id"),
    };

    // 8. Payment verification (needs order id + analysis id + secret)
    match (&order_id, &analysis_id, &config.razorpay_key_secret) {
        (Some(order), Some(analysis), Some(secret)) => {
            let payment_id = mock_payment_id();
            let signature = payment_signature(order, &payment_id, secret);
            let payload = json!({
                "razorpayOrderId": order,
                "razorpayPaymentId": payment_id,
                "razorpaySignature": signature,
                "analysisId": analysis,
                "userId": user_id,
            });
            let (outcome, elapsed_ms) =
                timed(client.post_json("/verify-payment", &payload, PAYMENT_TIMEOUT)).await;
            let eval = judge(outcome, checks::check_verify_payment);
            record(&mut run, "Verify Payment", eval, elapsed_ms);
        }
        (None, _, _) => {
            dependency_unmet(&mut run, "Verify Payment", "order id");
        }
        (_, None, _) => {
            dependency_unmet(&mut run, "Verify Payment", "analysis id");
        }
        (_, _, None) => {
            dependency_unmet(&mut run, "Verify Payment", "RAZORPAY_KEY_SECRET");
        }
    }

    // 9. Report unlock (needs analysis id)
    match &analysis_id {
        Some(analysis) => {
            let payload = json!({"analysisId": analysis, "userId": user_id});
            let (outcome, elapsed_ms) =
                timed(client.post_json("/unlock-report", &payload, PAYMENT_TIMEOUT)).await;
            let eval = judge(outcome, checks::check_unlock);
            record(&mut run, "Unlock Report", eval, elapsed_ms);
        }
        None => {
            dependency_unmet(&mut run, "Unlock Report", "analysis id");
        }
    }

    run
}

pub fn print_summary(run: &SuiteRun) {
    println!();
    println!("{}", "━".repeat(68));
    println!("SUMMARY");
    println!("{}", "━".repeat(68));

    for result in &run.results {
        println!("  {} {}: {:?}", mark(result.status), result.name, result.status);
    }

    println!();
    println!("{}/{} checks passed", run.passed(), run.total());
    if run.all_passed() {
        println!("✓ The backend honours its contract");
    } else {
        println!("⚠ {} check(s) failed", run.failed());
    }
}

/// Multipart body for the upload check: the embedded PDF plus the
/// per-run user id.
fn resume_form(user_id: &str) -> anyhow::Result<reqwest::multipart::Form> {
    let file = reqwest::multipart::Part::bytes(fixtures::TEST_RESUME_PDF)
        .file_name(fixtures::TEST_RESUME_FILENAME)
        .mime_str("application/pdf")?;
    Ok(reqwest::multipart::Form::new()
        .part("file", file)
        .text("userId", user_id.to_string()))
}

async fn timed<F>(call: F) -> (Result<ApiResponse, CallError>, u64)
where
    F: std::future::Future<Output = Result<ApiResponse, CallError>>,
{
    let started = Instant::now();
    let outcome = call.await;
    (outcome, started.elapsed().as_millis() as u64)
}

/// Transport failures become failed evals; responses go through the
/// endpoint validator.
fn judge(
    outcome: Result<ApiResponse, CallError>,
    validate: impl FnOnce(u16, &Value) -> CheckEval,
) -> CheckEval {
    match outcome {
        Ok(response) => validate(response.status, &response.body),
        Err(error) => {
            let status = match &error {
                CallError::Network(_) => CheckStatus::NetworkError,
                CallError::NonJson { .. } => CheckStatus::ProtocolError,
            };
            CheckEval::failed(status, error.to_string())
        }
    }
}

/// Record and print one outcome; returns the extracted value for
/// downstream checks.
fn record(run: &mut SuiteRun, name: &str, eval: CheckEval, elapsed_ms: u64) -> Option<String> {
    let result = CheckResult {
        name: name.to_string(),
        status: eval.status,
        detail: eval.detail,
        elapsed_ms,
        extracted: eval.extracted,
    };

    println!("  {} → {:?} ({}ms)", result.name, result.status, result.elapsed_ms);
    println!("    {} {}", mark(result.status), result.detail);

    let extracted = result.extracted.clone();
    run.record(result);
    extracted
}

/// Record a check whose producer never delivered; no request is issued.
fn dependency_unmet(run: &mut SuiteRun, name: &str, missing: &str) -> Option<String> {
    let eval = CheckEval::failed(
        CheckStatus::DependencyUnmet,
        format!("skipped: missing {missing} from an earlier check"),
    );
    record(run, name, eval, 0)
}

fn mark(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Passed => "✓",
        CheckStatus::DependencyUnmet => "⚠",
        _ => "✗",
    }
}
