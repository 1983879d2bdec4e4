//! Untrusted payload -> `ApplicantRecord`.
//!
//! Validation never stops at the first problem: every field is checked and
//! every violation is reported, so a client can fix a request in one round
//! trip. Error entries use the `{type, loc, msg, input}` shape clients of the
//! previous service already parse.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::applicant::{
    ApplicantRecord, Choice, Education, Gender, Housing, LoanPurpose, PriorDefault, columns,
};

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loc: Vec<Value>,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl FieldError {
    fn at_field(field: &str, kind: &'static str, msg: impl Into<String>, input: Option<&Value>) -> Self {
        Self {
            kind,
            loc: vec![Value::from("body"), Value::from(field)],
            msg: msg.into(),
            input: input.cloned(),
        }
    }

    /// The field name this error points at, if it points at one.
    pub fn field(&self) -> Option<&str> {
        self.loc.get(1).and_then(Value::as_str)
    }
}

/// All violations found in one payload (never empty).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn single(error: FieldError) -> Self {
        Self { errors: vec![error] }
    }

    /// Names of the offending fields, in declaration order.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().filter_map(FieldError::field).collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.errors.len();
        write!(f, "{n} validation error{}", if n == 1 { "" } else { "s" })?;
        for e in &self.errors {
            match e.field() {
                Some(field) => write!(f, "; {field}: {}", e.msg)?,
                None => write!(f, "; {}", e.msg)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Parse a raw request body and validate it.
pub fn parse_applicant(body: &[u8]) -> Result<ApplicantRecord, ValidationErrors> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ValidationErrors::single(FieldError {
            kind: "json_invalid",
            loc: vec![Value::from("body"), Value::from(e.column())],
            msg: format!("JSON decode error: {e}"),
            input: None,
        })
    })?;
    validate_applicant(&value)
}

/// Validate an already-decoded JSON value.
pub fn validate_applicant(payload: &Value) -> Result<ApplicantRecord, ValidationErrors> {
    let Some(obj) = payload.as_object() else {
        return Err(ValidationErrors::single(FieldError {
            kind: "model_attributes_type",
            loc: vec![Value::from("body")],
            msg: "Input should be a valid dictionary or object to extract fields from".to_string(),
            input: Some(payload.clone()),
        }));
    };

    let mut r = Reader::new(obj);

    let age = r.int(columns::AGE, &[Bound::Gt(0.0)]);
    let gender = r.choice::<Gender>(columns::GENDER);
    let education = r.choice::<Education>(columns::EDUCATION);
    let annual_income = r.float(columns::ANNUAL_INCOME, &[Bound::Gt(0.0)]);
    let experience_years = r.int(columns::EXPERIENCE_YEARS, &[Bound::Ge(0.0)]);
    let housing = r.choice::<Housing>(columns::HOUSING);
    let loan_amount = r.float(columns::LOAN_AMOUNT, &[Bound::Gt(0.0)]);
    let loan_purpose = r.choice::<LoanPurpose>(columns::LOAN_PURPOSE);
    let interest_rate = r.float(columns::INTEREST_RATE, &[Bound::Gt(0.0)]);
    let income_committed = r.float(columns::INCOME_COMMITTED, &[Bound::Ge(0.0), Bound::Le(1.0)]);
    let credit_history_years = r.int(columns::CREDIT_HISTORY_YEARS, &[Bound::Gt(0.0)]);
    let credit_score = r.int(columns::CREDIT_SCORE, &[Bound::Gt(0.0)]);
    let prior_default = r.choice::<PriorDefault>(columns::PRIOR_DEFAULT);
    let installments = r.int(columns::INSTALLMENTS, &[Bound::Gt(0.0)]);

    let (
        Some(age),
        Some(gender),
        Some(education),
        Some(annual_income),
        Some(experience_years),
        Some(housing),
        Some(loan_amount),
        Some(loan_purpose),
        Some(interest_rate),
        Some(income_committed),
        Some(credit_history_years),
        Some(credit_score),
        Some(prior_default),
        Some(installments),
    ) = (
        age,
        gender,
        education,
        annual_income,
        experience_years,
        housing,
        loan_amount,
        loan_purpose,
        interest_rate,
        income_committed,
        credit_history_years,
        credit_score,
        prior_default,
        installments,
    )
    else {
        return Err(ValidationErrors { errors: r.errors });
    };

    Ok(ApplicantRecord {
        age,
        gender,
        education,
        annual_income,
        experience_years,
        housing,
        loan_amount,
        loan_purpose,
        interest_rate,
        income_committed,
        credit_history_years,
        credit_score,
        prior_default,
        installments,
    })
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Gt(f64),
    Ge(f64),
    Le(f64),
}

impl Bound {
    fn check(self, x: f64) -> Result<(), (&'static str, String)> {
        match self {
            Bound::Gt(b) if x <= b => Err(("greater_than", format!("Input should be greater than {b}"))),
            Bound::Ge(b) if x < b => Err((
                "greater_than_equal",
                format!("Input should be greater than or equal to {b}"),
            )),
            Bound::Le(b) if x > b => Err((
                "less_than_equal",
                format!("Input should be less than or equal to {b}"),
            )),
            _ => Ok(()),
        }
    }
}

struct Reader<'a> {
    obj: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Reader<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            errors: Vec::new(),
        }
    }

    fn present(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.obj.get(field);
        if value.is_none() {
            self.errors
                .push(FieldError::at_field(field, "missing", "Field required", None));
        }
        value
    }

    fn bounded(&mut self, field: &str, value: &Value, x: f64, bounds: &[Bound]) -> bool {
        for bound in bounds {
            if let Err((kind, msg)) = bound.check(x) {
                self.errors.push(FieldError::at_field(field, kind, msg, Some(value)));
                return false;
            }
        }
        true
    }

    fn int(&mut self, field: &str, bounds: &[Bound]) -> Option<i64> {
        let value = self.present(field)?;
        match coerce_int(value) {
            Ok(i) => self.bounded(field, value, i as f64, bounds).then_some(i),
            Err((kind, msg)) => {
                self.errors.push(FieldError::at_field(field, kind, msg, Some(value)));
                None
            }
        }
    }

    fn float(&mut self, field: &str, bounds: &[Bound]) -> Option<f64> {
        let value = self.present(field)?;
        match coerce_float(value) {
            Ok(x) if x.is_finite() => self.bounded(field, value, x, bounds).then_some(x),
            Ok(_) => {
                self.errors.push(FieldError::at_field(
                    field,
                    "finite_number",
                    "Input should be a finite number",
                    Some(value),
                ));
                None
            }
            Err((kind, msg)) => {
                self.errors.push(FieldError::at_field(field, kind, msg, Some(value)));
                None
            }
        }
    }

    fn choice<T: Choice>(&mut self, field: &str) -> Option<T> {
        let value = self.present(field)?;
        let found = value.as_str().and_then(T::from_label);
        if found.is_none() {
            self.errors.push(FieldError::at_field(
                field,
                "literal_error",
                format!("Input should be {}", quoted_alternatives(&T::labels())),
                Some(value),
            ));
        }
        found
    }
}

type Rejection = (&'static str, &'static str);

const INT_TYPE: Rejection = ("int_type", "Input should be a valid integer");
const INT_PARSING: Rejection = ("int_parsing", "Input should be a valid integer, unable to parse string as an integer");
const FLOAT_TYPE: Rejection = ("float_type", "Input should be a valid number");
const FLOAT_PARSING: Rejection = ("float_parsing", "Input should be a valid number, unable to parse string as a number");

/// Lax integer: JSON integers, whole floats, booleans and integer strings.
fn coerce_int(value: &Value) -> Result<i64, Rejection> {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i),
            (None, Some(f)) => whole_float(f),
            (None, None) => Err(INT_TYPE),
        },
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => {
            let s = s.trim();
            // "21.0" and "21.00" still name an integer.
            let digits = match s.split_once('.') {
                Some((whole, zeros)) if !whole.is_empty() && zeros.chars().all(|c| c == '0') => whole,
                _ => s,
            };
            digits.parse::<i64>().map_err(|_| INT_PARSING)
        }
        _ => Err(INT_TYPE),
    }
}

fn whole_float(f: f64) -> Result<i64, Rejection> {
    if f.fract() != 0.0 {
        Err((
            "int_from_float",
            "Input should be a valid integer, got a number with a fractional part",
        ))
    } else if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err((
            "int_parsing_size",
            "Unable to parse input as an integer, exceeded maximum size",
        ))
    }
}

/// Lax float: any JSON number, booleans and numeric strings.
fn coerce_float(value: &Value) -> Result<f64, Rejection> {
    match value {
        Value::Number(n) => n.as_f64().ok_or(FLOAT_TYPE),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| FLOAT_PARSING),
        _ => Err(FLOAT_TYPE),
    }
}

/// `'a'`, `'a' or 'b'`, `'a', 'b' or 'c'`.
fn quoted_alternatives(labels: &[&str]) -> String {
    let quoted: Vec<String> = labels.iter().map(|l| format!("'{l}'")).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}
