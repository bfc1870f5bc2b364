//! End-to-end scenarios through the public API: artifacts are loaded from disk the way the
//! server loads them at startup, then driven through the service, the router, and batch
//! scoring.

mod common {
    use std::path::PathBuf;

    use loan_advisor::advisor::{
        InferenceContext, LinearClassifier, LoanAdvisorService, LoanApplicationForm,
        StandardScaler,
    };
    use loan_advisor::config::ModelConfig;

    pub(super) fn shipped_models() -> ModelConfig {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models");
        ModelConfig {
            scaler_path: root.join("scaler.json"),
            classifier_path: root.join("classifier.json"),
            cache_capacity: 32,
        }
    }

    pub(super) fn build_service() -> LoanAdvisorService<StandardScaler, LinearClassifier> {
        let context = InferenceContext::load(&shipped_models()).expect("sample artifacts load");
        LoanAdvisorService::new(context)
    }

    pub(super) fn form(
        gender: &str,
        marital_status: &str,
        monthly_income: f64,
        loan_amount: f64,
        credit_history: &str,
    ) -> LoanApplicationForm {
        LoanApplicationForm {
            gender: gender.to_string(),
            marital_status: marital_status.to_string(),
            monthly_income,
            loan_amount,
            credit_history: credit_history.to_string(),
        }
    }
}

mod startup {
    use super::common::*;
    use std::io::Write;

    use loan_advisor::advisor::{ArtifactError, ArtifactKind, InferenceContext};

    #[test]
    fn shipped_artifacts_match_the_encoder() {
        let context = InferenceContext::load(&shipped_models()).expect("sample artifacts load");

        assert_eq!(context.input_dim(), loan_advisor::advisor::FEATURE_COUNT);
        assert!(context.cache().is_some());
    }

    #[test]
    fn missing_classifier_fails_startup() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = shipped_models();
        config.classifier_path = dir.path().join("classifier.json");

        match InferenceContext::load(&config) {
            Err(ArtifactError::Missing { kind, .. }) => assert_eq!(kind, ArtifactKind::Classifier),
            Err(other) => panic!("expected missing classifier, got {other:?}"),
            Ok(_) => panic!("startup must fail without a classifier"),
        }
    }

    #[test]
    fn corrupt_scaler_fails_startup() {
        let mut scaler = tempfile::NamedTempFile::new().expect("temp file");
        write!(scaler, "\u{80}\u{4} pickled bytes").expect("write artifact");
        let mut config = shipped_models();
        config.scaler_path = scaler.path().to_path_buf();

        match InferenceContext::load(&config) {
            Err(ArtifactError::Malformed { kind, .. }) => assert_eq!(kind, ArtifactKind::Scaler),
            Err(other) => panic!("expected malformed scaler, got {other:?}"),
            Ok(_) => panic!("startup must fail with a corrupt scaler"),
        }
    }

    #[test]
    fn four_feature_artifacts_fail_startup() {
        let dir = tempfile::tempdir().expect("temp dir");
        let scaler_path = dir.path().join("scaler.json");
        let classifier_path = dir.path().join("classifier.json");
        std::fs::write(&scaler_path, r#"{"mean":[0,0,0,0],"scale":[1,1,1,1]}"#)
            .expect("write scaler");
        std::fs::write(
            &classifier_path,
            r#"{"coefficients":[1,1,1,1],"intercept":0}"#,
        )
        .expect("write classifier");

        let mut config = shipped_models();
        config.scaler_path = scaler_path;
        config.classifier_path = classifier_path;

        match InferenceContext::load(&config) {
            Err(ArtifactError::FeatureCount { expected, found }) => {
                assert_eq!((expected, found), (5, 4));
            }
            Err(other) => panic!("expected feature count mismatch, got {other:?}"),
            Ok(_) => panic!("startup must fail on a four feature model"),
        }
    }

    #[test]
    fn reordered_scaler_features_fail_startup() {
        let dir = tempfile::tempdir().expect("temp dir");
        let scaler_path = dir.path().join("scaler.json");
        std::fs::write(
            &scaler_path,
            r#"{
                "feature_names": ["credit_history", "loan_amount", "applicant_income", "married", "gender"],
                "mean": [0.8422, 146.41, 5403.46, 0.6531, 0.1866],
                "scale": [0.3646, 84.04, 6104.06, 0.4760, 0.3896]
            }"#,
        )
        .expect("write scaler");

        let mut config = shipped_models();
        config.scaler_path = scaler_path;

        match InferenceContext::load(&config) {
            Err(ArtifactError::FeatureOrder { expected, found }) => {
                assert_eq!(expected[0], "gender");
                assert_eq!(found[0], "credit_history");
            }
            Err(other) => panic!("expected feature order mismatch, got {other:?}"),
            Ok(_) => panic!("startup must fail when the scaler features are reordered"),
        }
    }
}

mod scenarios {
    use super::common::*;
    use loan_advisor::advisor::{AdvisorError, FeatureVector, Verdict};

    #[test]
    fn scenario_one_is_approved_and_stable() {
        let service = build_service();
        let application = form("Male", "Married", 5000.0, 150_000.0, "No Unclear Debts");

        let first = service.assess(&application).expect("assessment");
        let second = service.assess(&application).expect("assessment");

        assert_eq!(first.features, FeatureVector([0.0, 1.0, 5000.0, 150.0, 1.0]));
        assert_eq!(first.verdict, Verdict::Approved);
        assert_eq!(first.verdict.to_string(), "Approved");
        assert_eq!(first, second);
    }

    #[test]
    fn scenario_two_is_rejected() {
        let service = build_service();
        let application = form("Female", "Unmarried", 0.0, 500_000.0, "Unclear Debts");

        let assessment = service.assess(&application).expect("assessment");

        assert_eq!(
            assessment.features,
            FeatureVector([1.0, 0.0, 0.0, 500.0, 0.0])
        );
        assert_eq!(assessment.verdict.to_string(), "Rejected");
    }

    #[test]
    fn zero_amounts_are_scored() {
        let service = build_service();

        let assessment = service
            .assess(&form("Male", "Unmarried", 0.0, 0.0, "Clear"))
            .expect("zero amounts are valid");

        assert!(matches!(
            assessment.verdict,
            Verdict::Approved | Verdict::Rejected
        ));
    }

    #[test]
    fn unknown_gender_is_invalid_input() {
        let service = build_service();

        match service.assess(&form("Unknown", "Married", 5000.0, 1000.0, "Clear")) {
            Err(AdvisorError::InvalidInput(err)) => {
                assert!(err.to_string().contains("gender"));
            }
            other => panic!("expected invalid input, got {other:?}"),
        }
    }
}

mod http {
    use super::common::*;
    use axum::http::{header, Request, StatusCode};
    use loan_advisor::advisor::advisor_router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn predict_route_serves_verdicts_from_loaded_model() {
        let router = advisor_router(Arc::new(build_service()));
        let payload = json!({
            "gender": "Male",
            "marital_status": "Married",
            "monthly_income": 5000,
            "loan_amount": 150000,
            "credit_history": "No Unclear Debts",
        });

        let response = router
            .oneshot(
                Request::post("/api/v1/loan/predict")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&payload).expect("serialize"),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        let body: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(body["verdict"], "Approved");
    }
}

mod batch {
    use super::common::*;
    use loan_advisor::advisor::{score_csv, RowOutcome, Verdict};

    #[test]
    fn batch_scores_feature_name_export() {
        let service = build_service();
        let input = "\
gender,married,applicant_income,loan_amount,credit_history
Male,Married,5000,150000,No Unclear Debts
Female,Unmarried,0,500000,Unclear Debts
Female,Married,-10,1000,Clear
";

        let rows = score_csv(input.as_bytes(), &service).expect("batch scores");

        let verdicts: Vec<Option<Verdict>> = rows
            .iter()
            .map(|row| match &row.outcome {
                RowOutcome::Scored { verdict, .. } => Some(*verdict),
                RowOutcome::Invalid { .. } => None,
            })
            .collect();
        assert_eq!(
            verdicts,
            vec![Some(Verdict::Approved), Some(Verdict::Rejected), None]
        );
    }
}
