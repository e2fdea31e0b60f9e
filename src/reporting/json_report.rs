// JSON実行レポートの書き出し
//
// 実行中は結果をメモリに蓄積し、終端イベントを受け取った時点で
// 1回だけレポートファイルを書き出す。

use super::ProgressSink;
use crate::core::{BatchEvent, BatchSummary, InvocationOutcome, RunTermination};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 1回の実行の監査レポート
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunReport {
    /// 書き出し時刻（RFC3339）
    pub generated_at: String,
    pub summary: BatchSummary,
    pub termination: RunTermination,
    pub outcomes: Vec<InvocationOutcome>,
    pub diagnostics: Vec<ReportDiagnostic>,
}

/// 走査診断のレポート表現
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReportDiagnostic {
    pub path: PathBuf,
    pub message: String,
}

/// 実行レポートをJSONファイルへ書き出すシンク
pub struct JsonReportSink {
    output_path: PathBuf,
    outcomes: Mutex<Vec<InvocationOutcome>>,
    diagnostics: Mutex<Vec<ReportDiagnostic>>,
}

impl JsonReportSink {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            outcomes: Mutex::new(Vec::new()),
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn write_report(&self, summary: BatchSummary, termination: RunTermination) {
        let report = RunReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary,
            termination,
            outcomes: self.outcomes.lock().unwrap().clone(),
            diagnostics: self.diagnostics.lock().unwrap().clone(),
        };

        let rendered = match serde_json::to_string_pretty(&report) {
            Ok(rendered) => rendered,
            Err(error) => {
                eprintln!("❌ レポートのシリアライズに失敗しました: {error}");
                return;
            }
        };

        if let Err(error) = std::fs::write(&self.output_path, rendered) {
            eprintln!(
                "❌ レポート書き込み失敗: {} - {error}",
                self.output_path.display()
            );
        }
    }
}

#[async_trait]
impl ProgressSink for JsonReportSink {
    async fn deliver(&self, event: BatchEvent) {
        match event {
            BatchEvent::Progress(outcome) => {
                self.outcomes.lock().unwrap().push(outcome);
            }
            BatchEvent::Diagnostic { path, message } => {
                self.diagnostics
                    .lock()
                    .unwrap()
                    .push(ReportDiagnostic { path, message });
            }
            BatchEvent::Summary {
                summary,
                termination,
            } => {
                self.write_report(summary, termination);
            }
        }
    }
}
