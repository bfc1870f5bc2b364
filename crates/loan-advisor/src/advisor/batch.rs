use std::io::Read;

use serde::Serialize;

use super::artifacts::{BinaryClassifier, FeatureScaler};
use super::domain::{FeatureVector, LoanApplicationForm, Verdict};
use super::inference::InferenceError;
use super::service::{AdvisorError, LoanAdvisorService};

/// Errors that abort a whole batch.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read batch input: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Per-record result; `line` is the 1-based line in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub line: u64,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    Scored {
        verdict: Verdict,
        features: FeatureVector,
    },
    Invalid {
        reason: String,
    },
}

/// Score every record of a CSV export.
///
/// Headers accept either the API field names or the model feature names
/// (`married`, `applicant_income`). Rows that fail to parse or validate are reported
/// in place; unreadable input and model mismatches abort.
pub fn score_csv<R, S, C>(
    reader: R,
    service: &LoanAdvisorService<S, C>,
) -> Result<Vec<BatchRow>, BatchError>
where
    R: Read,
    S: FeatureScaler + 'static,
    C: BinaryClassifier + 'static,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    loop {
        match csv_reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let line = record
                    .position()
                    .map(|position| position.line())
                    .unwrap_or_default();
                let outcome = match record.deserialize::<LoanApplicationForm>(Some(&headers)) {
                    Ok(form) => match service.assess(&form) {
                        Ok(assessment) => RowOutcome::Scored {
                            verdict: assessment.verdict,
                            features: assessment.features,
                        },
                        Err(AdvisorError::InvalidInput(err)) => RowOutcome::Invalid {
                            reason: err.to_string(),
                        },
                        Err(AdvisorError::Inference(err)) => return Err(err.into()),
                    },
                    Err(err) => RowOutcome::Invalid {
                        reason: err.to_string(),
                    },
                };
                rows.push(BatchRow { line, outcome });
            }
            Err(err) if matches!(err.kind(), csv::ErrorKind::UnequalLengths { .. }) => {
                let line = err
                    .position()
                    .map(|position| position.line())
                    .unwrap_or_default();
                rows.push(BatchRow {
                    line,
                    outcome: RowOutcome::Invalid {
                        reason: err.to_string(),
                    },
                });
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(rows)
}
