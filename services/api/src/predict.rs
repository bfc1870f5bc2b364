use crate::cli::ModelArgs;
use crate::infra::{load_advisor, load_config};
use clap::Args;
use loan_advisor::advisor::{
    score_csv, Assessment, BatchRow, FieldControl, FormDefinition, LoanApplicationForm,
    RowOutcome, Verdict, FEATURE_NAMES,
};
use loan_advisor::error::AppError;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Applicant gender (Male or Female)
    #[arg(long)]
    pub(crate) gender: String,
    /// Marital status (Married or Unmarried)
    #[arg(long = "married", visible_alias = "marital-status")]
    pub(crate) marital_status: String,
    /// Monthly income in USD
    #[arg(long = "income", visible_alias = "monthly-income")]
    pub(crate) monthly_income: f64,
    /// Requested loan amount in USD
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Credit history ("Unclear Debts" or "No Unclear Debts")
    #[arg(long)]
    pub(crate) credit_history: String,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) models: ModelArgs,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with gender, married, applicant_income, loan_amount, credit_history columns
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the rows as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) models: ModelArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FormArgs {
    /// Print the form definition as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        gender,
        marital_status,
        monthly_income,
        loan_amount,
        credit_history,
        json,
        models,
    } = args;

    let config = load_config(models)?;
    let advisor = load_advisor(&config)?;

    let form = LoanApplicationForm {
        gender,
        marital_status,
        monthly_income,
        loan_amount,
        credit_history,
    };
    let assessment = advisor.assess(&form)?;

    if json {
        print_json(&assessment);
    } else {
        render_assessment(&assessment);
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        input,
        json,
        models,
    } = args;

    let config = load_config(models)?;
    let advisor = load_advisor(&config)?;

    let reader = BufReader::new(File::open(&input)?);
    let rows = score_csv(reader, advisor.as_ref())?;

    if json {
        print_json(&rows);
    } else {
        render_batch(&input, &rows);
    }
    Ok(())
}

pub(crate) fn run_form(args: FormArgs) -> Result<(), AppError> {
    let definition = FormDefinition::standard();
    if args.json {
        print_json(&definition);
    } else {
        render_form(&definition);
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("JSON output unavailable: {err}"),
    }
}

pub(crate) fn verdict_line(verdict: Verdict) -> String {
    let marker = if verdict.is_approved() { "[ok]" } else { "[x]" };
    format!("{marker} Your loan application status: {verdict}")
}

fn render_assessment(assessment: &Assessment) {
    let application = &assessment.application;
    println!("Smart Loan Approval Advisor");
    println!(
        "Applicant: {} | {} | income ${:.0}/month | loan ${:.0} | credit {}",
        application.gender().label(),
        application.marital_status().label(),
        application.monthly_income(),
        application.loan_amount(),
        application.credit_history().form_label()
    );

    println!("\nEncoded features");
    for (name, value) in FEATURE_NAMES.iter().zip(assessment.features.as_slice()) {
        println!("- {name}: {value}");
    }

    println!("\n{}", verdict_line(assessment.verdict));
}

fn render_batch(input: &std::path::Path, rows: &[BatchRow]) {
    println!("Batch assessment: {}", input.display());

    let mut approved = 0usize;
    let mut rejected = 0usize;
    let mut invalid = 0usize;
    for row in rows {
        match &row.outcome {
            RowOutcome::Scored { verdict, .. } => {
                if verdict.is_approved() {
                    approved += 1;
                } else {
                    rejected += 1;
                }
                println!("- line {}: {}", row.line, verdict);
            }
            RowOutcome::Invalid { reason } => {
                invalid += 1;
                println!("- line {}: invalid ({})", row.line, reason);
            }
        }
    }

    println!(
        "\n{} rows | {} approved | {} rejected | {} invalid",
        rows.len(),
        approved,
        rejected,
        invalid
    );
}

fn render_form(definition: &FormDefinition) {
    println!("{}", definition.title);
    println!("{}", definition.tagline);

    println!("\nApplication Details");
    for field in &definition.fields {
        let control = match &field.control {
            FieldControl::Radio { options } | FieldControl::Select { options } => {
                options.join(" / ")
            }
            FieldControl::Slider { min, max, step } => {
                format!("{min} to {max}, step {step}")
            }
        };
        println!("- {} [{}]: {}", field.label, field.field, control);
        println!("  {}", field.help);
    }

    println!("\nFrequently asked");
    for entry in &definition.faq {
        println!("- {}", entry.question);
        println!("  {}", entry.answer);
    }
}
