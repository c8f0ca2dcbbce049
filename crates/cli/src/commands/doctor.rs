use lagobot_core::config::{AppConfig, LoadOptions};
use lagobot_inventory::{backup::load_backup, SheetsClient};
use secrecy::ExposeSecret;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog_source(&config));
            checks.push(check_whatsapp_credentials(&config));
            checks.push(check_llm_readiness(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["catalog_source", "whatsapp_credentials", "llm_readiness"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_ok = checks.iter().all(|check| check.status != CheckStatus::Fail);
    let overall_status = if all_ok { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_ok {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Sheets probe when a spreadsheet is configured; otherwise the local
/// snapshot must at least parse.
fn check_catalog_source(config: &AppConfig) -> DoctorCheck {
    if config.sheets.spreadsheet_id.trim().is_empty() {
        return match load_backup(&config.sheets.backup_csv_path) {
            Ok(records) => DoctorCheck {
                name: "catalog_source",
                status: CheckStatus::Pass,
                details: format!(
                    "no spreadsheet configured; backup snapshot `{}` holds {} product(s)",
                    config.sheets.backup_csv_path.display(),
                    records.len()
                ),
            },
            Err(error) => DoctorCheck {
                name: "catalog_source",
                status: CheckStatus::Fail,
                details: format!("no spreadsheet configured and backup snapshot unusable: {error}"),
            },
        };
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "catalog_source",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let probe = runtime.block_on(async {
        let client = SheetsClient::new(&config.sheets)
            .map_err(|error| format!("sheets client setup failed: {error}"))?;
        client.probe().await.map_err(|error| format!("spreadsheet unreachable: {error}"))
    });

    match probe {
        Ok(()) => DoctorCheck {
            name: "catalog_source",
            status: CheckStatus::Pass,
            details: format!("spreadsheet `{}` reachable", config.sheets.spreadsheet_id),
        },
        Err(error) => DoctorCheck {
            name: "catalog_source",
            status: CheckStatus::Fail,
            details: format!("{error} (the bot would fall back to the backup snapshot)"),
        },
    }
}

fn check_whatsapp_credentials(config: &AppConfig) -> DoctorCheck {
    let access_token_set = !config.whatsapp.access_token.expose_secret().trim().is_empty();
    let verify_token_set = !config.whatsapp.verify_token.expose_secret().trim().is_empty();
    let phone_number_set = !config.whatsapp.phone_number_id.trim().is_empty();

    if access_token_set && verify_token_set && phone_number_set {
        return DoctorCheck {
            name: "whatsapp_credentials",
            status: CheckStatus::Pass,
            details: "access token, verify token, and phone number id are present".to_string(),
        };
    }

    if !access_token_set && !verify_token_set && !phone_number_set {
        return DoctorCheck {
            name: "whatsapp_credentials",
            status: CheckStatus::Pass,
            details: "not configured; `chat` and `search` work, the webhook server will not start"
                .to_string(),
        };
    }

    let mut missing = Vec::new();
    if !access_token_set {
        missing.push("whatsapp.access_token");
    }
    if !verify_token_set {
        missing.push("whatsapp.verify_token");
    }
    if !phone_number_set {
        missing.push("whatsapp.phone_number_id");
    }
    DoctorCheck {
        name: "whatsapp_credentials",
        status: CheckStatus::Fail,
        details: format!("partial credentials; missing: {}", missing.join(", ")),
    }
}

fn check_llm_readiness(config: &AppConfig) -> DoctorCheck {
    if config.llm_enabled() {
        DoctorCheck {
            name: "llm_readiness",
            status: CheckStatus::Pass,
            details: format!("api key present; model `{}`", config.llm.model),
        }
    } else {
        DoctorCheck {
            name: "llm_readiness",
            status: CheckStatus::Pass,
            details: "no api key; the bot answers with fixed replies instead of generated text"
                .to_string(),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
