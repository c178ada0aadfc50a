/// Response Validators - Endpoint Contract Checks
///
/// **Core Responsibility:**
/// Judge (status code, parsed JSON body) pairs against each endpoint's
/// documented contract.
///
/// **Critical Properties:**
/// - Knows nothing about reqwest or how requests were issued
/// - Knows nothing about check ordering or dependencies
/// - Pure functions: (status, body, expectations) → CheckEval
///
/// **Shared Rules:**
/// - Any non-2xx status is a ProtocolError carrying the status and a
///   bounded body excerpt
/// - A 2xx body missing required fields or carrying unexpected values
///   is a ContractViolation with an explicit mismatch detail
/// - Details are always populated on failure
///
/// **Why This Exists:**
/// Separates contract judgement from request plumbing. Guarantees the
/// same response always evaluates the same way, which the unit tests
/// below rely on.
use placementor_common::types::CheckStatus;
use serde_json::Value;

/// Category breakdown keys the analysis report must carry.
const CATEGORY_KEYS: [&str; 4] = [
    "technical_skills",
    "project_depth",
    "industry_readiness",
    "resume_strength",
];

/// Verdict of one validator over one response.
#[derive(Debug, Clone)]
pub struct CheckEval {
    pub status: CheckStatus,
    pub detail: String,
    pub extracted: Option<String>,
}

impl CheckEval {
    pub fn pass(detail: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Passed,
            detail: detail.into(),
            extracted: None,
        }
    }

    pub fn pass_extracting(detail: impl Into<String>, extracted: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Passed,
            detail: detail.into(),
            extracted: Some(extracted.into()),
        }
    }

    pub fn violation(detail: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::ContractViolation,
            detail: detail.into(),
            extracted: None,
        }
    }

    pub fn failed(status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            extracted: None,
        }
    }
}

/// Expected literals for the order-creation contract.
#[derive(Debug, Clone)]
pub struct OrderExpectations<'a> {
    pub amount: u64,
    pub currency: &'a str,
    pub key_id: &'a str,
}

/// GET /health: `status == "ok"` plus an RFC 3339 timestamp.
pub fn check_health(status: u16, body: &Value) -> CheckEval {
    if let Some(eval) = non_success(status, body) {
        return eval;
    }

    match str_field(body, "status") {
        Some("ok") => {}
        Some(other) => return CheckEval::violation(format!("invalid status \"{other}\"")),
        None => return CheckEval::violation("missing \"status\" field"),
    }

    match str_field(body, "timestamp") {
        Some(timestamp) => match chrono::DateTime::parse_from_rfc3339(timestamp) {
            Ok(_) => CheckEval::pass(format!("status ok, timestamp {timestamp}")),
            Err(_) => CheckEval::violation(format!("timestamp \"{timestamp}\" is not RFC 3339")),
        },
        None => CheckEval::violation("missing \"timestamp\" field"),
    }
}

/// GET /roles: at least `min_roles` entries, each with id and name.
/// Extracts the first role id for the analyze check.
pub fn check_roles(status: u16, body: &Value, min_roles: usize) -> CheckEval {
    if let Some(eval) = non_success(status, body) {
        return eval;
    }

    let Some(roles) = body.get("roles").and_then(Value::as_array) else {
        return CheckEval::violation("missing \"roles\" array");
    };
    if roles.len() < min_roles {
        return CheckEval::violation(format!(
            "expected at least {min_roles} roles, got {}",
            roles.len()
        ));
    }

    let mut names = Vec::new();
    for (index, role) in roles.iter().enumerate() {
        let id = str_field(role, "id").unwrap_or("");
        let name = str_field(role, "name").unwrap_or("");
        if id.is_empty() || name.is_empty() {
            return CheckEval::violation(format!("role #{index} lacks an id or name"));
        }
        names.push(name);
    }

    let shown = names
        .iter()
        .take(3)
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    CheckEval {
        status: CheckStatus::Passed,
        detail: format!("found {} roles: {shown}", roles.len()),
        extracted: roles
            .first()
            .and_then(|role| str_field(role, "id"))
            .map(str::to_string),
    }
}

/// POST /upload-resume: success flag, resume id, text-length metric.
/// Extracts the resume id.
pub fn check_upload(status: u16, body: &Value) -> CheckEval {
    if let Some(eval) = non_success(status, body) {
        return eval;
    }
    if !success_flag(body) {
        return CheckEval::violation(format!("success flag missing or false: {}", compact(body)));
    }

    let Some(resume_id) = non_empty_str(body, "resumeId") else {
        return CheckEval::violation("missing or empty \"resumeId\"");
    };
    let Some(text_length) = body.get("textLength").and_then(Value::as_u64) else {
        return CheckEval::violation("missing numeric \"textLength\"");
    };

    CheckEval::pass_extracting(
        format!("resume {resume_id} accepted, {text_length} chars extracted"),
        resume_id,
    )
}

/// POST /analyze: success flag, analysis id, and a nested report with
/// an overall score in 0..=100 plus all category breakdowns.
/// Extracts the analysis id.
pub fn check_analysis(status: u16, body: &Value) -> CheckEval {
    if let Some(eval) = non_success(status, body) {
        return eval;
    }
    if !success_flag(body) {
        return CheckEval::violation(format!("success flag missing or false: {}", compact(body)));
    }

    let Some(analysis_id) = non_empty_str(body, "analysisId") else {
        return CheckEval::violation("missing or empty \"analysisId\"");
    };
    let Some(analysis) = body.get("analysis").filter(|a| a.is_object()) else {
        return CheckEval::violation("missing \"analysis\" report object");
    };

    let Some(overall) = analysis.get("overall_score").and_then(Value::as_i64) else {
        return CheckEval::violation("report lacks an integer \"overall_score\"");
    };
    if !(0..=100).contains(&overall) {
        return CheckEval::violation(format!("overall_score {overall} outside 0..=100"));
    }

    let Some(categories) = analysis.get("category_scores").filter(|c| c.is_object()) else {
        return CheckEval::violation("report lacks a \"category_scores\" object");
    };
    for key in CATEGORY_KEYS {
        if categories.get(key).map(Value::is_number) != Some(true) {
            return CheckEval::violation(format!("category_scores lacks numeric \"{key}\""));
        }
    }

    CheckEval::pass_extracting(
        format!("analysis {analysis_id} scored {overall}/100"),
        analysis_id,
    )
}

/// GET /analyses?userId=...: the list must exist; empty is fine for a
/// user created this run.
pub fn check_analyses_list(status: u16, body: &Value) -> CheckEval {
    if let Some(eval) = non_success(status, body) {
        return eval;
    }

    match body.get("analyses").and_then(Value::as_array) {
        Some(analyses) if analyses.is_empty() => CheckEval::pass("no analyses yet for this user"),
        Some(analyses) => CheckEval::pass(format!("found {} analyses for user", analyses.len())),
        None => CheckEval::violation("missing \"analyses\" array"),
    }
}

/// GET /analysis/{id}: the stored report is retrievable by id.
pub fn check_single_analysis(status: u16, body: &Value, analysis_id: &str) -> CheckEval {
    if let Some(eval) = non_success(status, body) {
        return eval;
    }

    let Some(analysis) = body.get("analysis").filter(|a| a.is_object()) else {
        return CheckEval::violation("missing \"analysis\" object");
    };
    match str_field(analysis, "id") {
        Some(id) if id == analysis_id => {
            CheckEval::pass(format!("analysis {analysis_id} retrievable"))
        }
        Some(id) => {
            CheckEval::violation(format!("returned analysis {id}, requested {analysis_id}"))
        }
        None => CheckEval::violation("returned analysis has no id"),
    }
}

/// POST /create-order: success flag, order id, and the exact configured
/// amount/currency/key id. Extracts the order id.
pub fn check_order(status: u16, body: &Value, expect: &OrderExpectations<'_>) -> CheckEval {
    if let Some(eval) = non_success(status, body) {
        return eval;
    }
    if !success_flag(body) {
        return CheckEval::violation(format!("success flag missing or false: {}", compact(body)));
    }

    let Some(order_id) = non_empty_str(body, "orderId") else {
        return CheckEval::violation("missing or empty \"orderId\"");
    };

    let mut mismatches = Vec::new();
    match body.get("amount").and_then(Value::as_u64) {
        Some(amount) if amount == expect.amount => {}
        Some(amount) => mismatches.push(format!("amount={amount} (expected {})", expect.amount)),
        None => mismatches.push("amount missing".to_string()),
    }
    match str_field(body, "currency") {
        Some(currency) if currency == expect.currency => {}
        Some(currency) => {
            mismatches.push(format!("currency={currency} (expected {})", expect.currency));
        }
        None => mismatches.push("currency missing".to_string()),
    }
    match str_field(body, "keyId") {
        Some(key_id) if key_id == expect.key_id => {}
        Some(key_id) => mismatches.push(format!("keyId={key_id} (expected {})", expect.key_id)),
        None => mismatches.push("keyId missing".to_string()),
    }

    if !mismatches.is_empty() {
        return CheckEval::violation(format!("order details wrong: {}", mismatches.join("; ")));
    }

    CheckEval::pass_extracting(
        format!(
            "order {order_id}: amount {} {}, key {}",
            expect.amount, expect.currency, expect.key_id
        ),
        order_id,
    )
}

/// POST /verify-payment: the locally signed payload must be accepted.
pub fn check_verify_payment(status: u16, body: &Value) -> CheckEval {
    if let Some(eval) = non_success(status, body) {
        return eval;
    }
    if !success_flag(body) {
        return CheckEval::violation(format!("success flag missing or false: {}", compact(body)));
    }

    match str_field(body, "message") {
        Some(message) => CheckEval::pass(format!("payment accepted: {message}")),
        None => CheckEval::violation("missing confirmation \"message\""),
    }
}

/// POST /unlock-report: success flag only.
pub fn check_unlock(status: u16, body: &Value) -> CheckEval {
    if let Some(eval) = non_success(status, body) {
        return eval;
    }
    if !success_flag(body) {
        return CheckEval::violation(format!("success flag missing or false: {}", compact(body)));
    }
    CheckEval::pass("report unlocked")
}

fn non_success(status: u16, body: &Value) -> Option<CheckEval> {
    if (200..300).contains(&status) {
        return None;
    }
    Some(CheckEval::failed(
        CheckStatus::ProtocolError,
        format!("HTTP {status}: {}", compact(body)),
    ))
}

fn success_flag(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool) == Some(true)
}

fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

fn non_empty_str(body: &Value, key: &str) -> Option<String> {
    str_field(body, key)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Bounded single-line rendering of a body for failure details.
fn compact(body: &Value) -> String {
    const MAX_CHARS: usize = 200;
    let rendered = body.to_string();
    if rendered.chars().count() <= MAX_CHARS {
        rendered
    } else {
        rendered.chars().take(MAX_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Helper: a fully conforming analysis response.
    fn analysis_body() -> Value {
        json!({
            "success": true,
            "analysisId": "analysis-1",
            "analysis": {
                "overall_score": 62,
                "category_scores": {
                    "technical_skills": 55,
                    "project_depth": 60,
                    "industry_readiness": 70,
                    "resume_strength": 65
                }
            }
        })
    }

    fn roles_body(count: usize) -> Value {
        let roles: Vec<Value> = (0..count)
            .map(|i| json!({"id": format!("role_{i}"), "name": format!("Role {i}")}))
            .collect();
        json!({ "roles": roles })
    }

    #[test]
    fn test_health_ok() {
        let body = json!({"status": "ok", "timestamp": "2024-01-01T00:00:00Z"});
        let eval = check_health(200, &body);
        assert_eq!(eval.status, CheckStatus::Passed);
    }

    #[test]
    fn test_health_degraded_cites_the_status() {
        let eval = check_health(200, &json!({"status": "degraded"}));
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("degraded"));
    }

    #[test]
    fn test_health_missing_timestamp() {
        let eval = check_health(200, &json!({"status": "ok"}));
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("timestamp"));
    }

    #[test]
    fn test_health_rejects_garbage_timestamp() {
        let eval = check_health(200, &json!({"status": "ok", "timestamp": "yesterday"}));
        assert_eq!(eval.status, CheckStatus::ContractViolation);
    }

    #[test]
    fn test_health_non_2xx_is_protocol_error() {
        let eval = check_health(500, &json!({"error": "boom"}));
        assert_eq!(eval.status, CheckStatus::ProtocolError);
        assert!(eval.detail.contains("500"));
    }

    #[test]
    fn test_roles_minimum_met_extracts_first_id() {
        let eval = check_roles(200, &roles_body(3), 3);
        assert_eq!(eval.status, CheckStatus::Passed);
        assert_eq!(eval.extracted.as_deref(), Some("role_0"));
    }

    #[test]
    fn test_roles_below_minimum_fails_exactly() {
        let eval = check_roles(200, &roles_body(2), 3);
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("at least 3"));
        assert!(eval.detail.contains("got 2"));
    }

    #[test]
    fn test_roles_entry_without_name_fails() {
        let body = json!({"roles": [
            {"id": "a", "name": "A"},
            {"id": "b", "name": ""},
            {"id": "c", "name": "C"}
        ]});
        let eval = check_roles(200, &body, 3);
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("#1"));
    }

    #[test]
    fn test_upload_extracts_resume_id() {
        let body = json!({"success": true, "resumeId": "resume-9", "textLength": 656});
        let eval = check_upload(200, &body);
        assert_eq!(eval.status, CheckStatus::Passed);
        assert_eq!(eval.extracted.as_deref(), Some("resume-9"));
        assert!(eval.detail.contains("656"));
    }

    #[test]
    fn test_upload_without_success_flag() {
        let eval = check_upload(200, &json!({"resumeId": "resume-9", "textLength": 656}));
        assert_eq!(eval.status, CheckStatus::ContractViolation);
    }

    #[test]
    fn test_upload_empty_resume_id() {
        let eval = check_upload(200, &json!({"success": true, "resumeId": "", "textLength": 1}));
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("resumeId"));
    }

    #[test]
    fn test_upload_missing_text_length() {
        let eval = check_upload(200, &json!({"success": true, "resumeId": "resume-9"}));
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("textLength"));
    }

    #[test]
    fn test_analysis_full_shape_passes() {
        let eval = check_analysis(200, &analysis_body());
        assert_eq!(eval.status, CheckStatus::Passed);
        assert_eq!(eval.extracted.as_deref(), Some("analysis-1"));
    }

    #[test]
    fn test_analysis_missing_category_is_named() {
        let mut body = analysis_body();
        body["analysis"]["category_scores"]
            .as_object_mut()
            .unwrap()
            .remove("project_depth");
        let eval = check_analysis(200, &body);
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("project_depth"));
    }

    #[test]
    fn test_analysis_score_out_of_range() {
        let mut body = analysis_body();
        body["analysis"]["overall_score"] = json!(101);
        let eval = check_analysis(200, &body);
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("101"));
    }

    #[test]
    fn test_analysis_score_must_be_numeric() {
        let mut body = analysis_body();
        body["analysis"]["overall_score"] = json!("62");
        let eval = check_analysis(200, &body);
        assert_eq!(eval.status, CheckStatus::ContractViolation);
    }

    #[test]
    fn test_analyses_list_empty_is_a_pass() {
        let eval = check_analyses_list(200, &json!({"analyses": []}));
        assert_eq!(eval.status, CheckStatus::Passed);
    }

    #[test]
    fn test_analyses_list_missing_array_fails() {
        let eval = check_analyses_list(200, &json!({}));
        assert_eq!(eval.status, CheckStatus::ContractViolation);
    }

    #[test]
    fn test_single_analysis_id_roundtrip() {
        let eval = check_single_analysis(200, &json!({"analysis": {"id": "analysis-1"}}), "analysis-1");
        assert_eq!(eval.status, CheckStatus::Passed);
    }

    #[test]
    fn test_single_analysis_wrong_id() {
        let eval = check_single_analysis(200, &json!({"analysis": {"id": "other"}}), "analysis-1");
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("other"));
    }

    fn expectations() -> OrderExpectations<'static> {
        OrderExpectations {
            amount: 4900,
            currency: "INR",
            key_id: "rzp_test_SAqchxHGMT5s3I",
        }
    }

    #[test]
    fn test_order_matching_literals_pass() {
        let body = json!({
            "success": true,
            "orderId": "order_77",
            "amount": 4900,
            "currency": "INR",
            "keyId": "rzp_test_SAqchxHGMT5s3I"
        });
        let eval = check_order(200, &body, &expectations());
        assert_eq!(eval.status, CheckStatus::Passed);
        assert_eq!(eval.extracted.as_deref(), Some("order_77"));
    }

    #[test]
    fn test_order_amount_mismatch_names_both_values() {
        let body = json!({
            "success": true,
            "orderId": "order_77",
            "amount": 5000,
            "currency": "INR",
            "keyId": "rzp_test_SAqchxHGMT5s3I"
        });
        let eval = check_order(200, &body, &expectations());
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("5000"));
        assert!(eval.detail.contains("4900"));
    }

    #[test]
    fn test_order_collects_every_mismatch() {
        let body = json!({
            "success": true,
            "orderId": "order_77",
            "amount": 5000,
            "currency": "USD",
            "keyId": "rzp_live_other"
        });
        let eval = check_order(200, &body, &expectations());
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("amount"));
        assert!(eval.detail.contains("currency"));
        assert!(eval.detail.contains("keyId"));
    }

    #[test]
    fn test_order_missing_id_fails() {
        let body = json!({"success": true, "amount": 4900, "currency": "INR",
                          "keyId": "rzp_test_SAqchxHGMT5s3I"});
        let eval = check_order(200, &body, &expectations());
        assert_eq!(eval.status, CheckStatus::ContractViolation);
        assert!(eval.detail.contains("orderId"));
    }

    #[test]
    fn test_verify_payment_accepted() {
        let eval = check_verify_payment(200, &json!({"success": true, "message": "Payment verified"}));
        assert_eq!(eval.status, CheckStatus::Passed);
        assert!(eval.detail.contains("Payment verified"));
    }

    #[test]
    fn test_verify_payment_rejected() {
        let eval = check_verify_payment(200, &json!({"success": false, "error": "bad signature"}));
        assert_eq!(eval.status, CheckStatus::ContractViolation);
    }

    #[test]
    fn test_unlock_report() {
        assert_eq!(
            check_unlock(200, &json!({"success": true})).status,
            CheckStatus::Passed
        );
        assert_eq!(
            check_unlock(200, &json!({"success": false})).status,
            CheckStatus::ContractViolation
        );
        assert_eq!(
            check_unlock(404, &json!({"error": "Not found"})).status,
            CheckStatus::ProtocolError
        );
    }

    #[test]
    fn test_compact_bounds_large_bodies() {
        let body = json!({"blob": "y".repeat(5000)});
        assert!(compact(&body).chars().count() <= 200);
    }
}
