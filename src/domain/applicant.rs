//! The applicant record accepted by `/predict`.
//!
//! Wire names are Portuguese because they are the column names the model
//! artifact was produced against. Rust identifiers stay in English; the
//! `columns` module is the single place that ties the two together.

use serde::Serialize;

/// Wire/column names, in the order the single-row table is built.
pub mod columns {
    pub const AGE: &str = "idade";
    pub const GENDER: &str = "genero";
    pub const EDUCATION: &str = "escolaridade";
    pub const ANNUAL_INCOME: &str = "renda_anual";
    pub const EXPERIENCE_YEARS: &str = "experiencia_profissional_anos";
    pub const HOUSING: &str = "tipo_moradia";
    pub const LOAN_AMOUNT: &str = "valor_emprestimo";
    pub const LOAN_PURPOSE: &str = "finalidade_emprestimo";
    pub const INTEREST_RATE: &str = "taxa_juros_emprestimo";
    pub const INCOME_COMMITTED: &str = "percentual_renda_comprometida";
    pub const CREDIT_HISTORY_YEARS: &str = "historico_credito_anos";
    pub const CREDIT_SCORE: &str = "score_credito";
    pub const PRIOR_DEFAULT: &str = "inadimplencia_anterior";
    pub const INSTALLMENTS: &str = "numero_parcelas";

    pub const ALL: [&str; 14] = [
        AGE,
        GENDER,
        EDUCATION,
        ANNUAL_INCOME,
        EXPERIENCE_YEARS,
        HOUSING,
        LOAN_AMOUNT,
        LOAN_PURPOSE,
        INTEREST_RATE,
        INCOME_COMMITTED,
        CREDIT_HISTORY_YEARS,
        CREDIT_SCORE,
        PRIOR_DEFAULT,
        INSTALLMENTS,
    ];
}

/// A closed set of string labels accepted for a categorical field.
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    #[serde(rename = "masculino")]
    Male,
    #[serde(rename = "feminino")]
    Female,
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn label(self) -> &'static str {
        match self {
            Gender::Male => "masculino",
            Gender::Female => "feminino",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Education {
    #[serde(rename = "ensino_medio")]
    HighSchool,
    #[serde(rename = "tecnologo")]
    Technologist,
    #[serde(rename = "graduacao")]
    Bachelor,
    #[serde(rename = "mestrado")]
    Master,
    #[serde(rename = "doutorado")]
    Doctorate,
}

impl Choice for Education {
    const ALL: &'static [Self] = &[
        Education::HighSchool,
        Education::Technologist,
        Education::Bachelor,
        Education::Master,
        Education::Doctorate,
    ];

    fn label(self) -> &'static str {
        match self {
            Education::HighSchool => "ensino_medio",
            Education::Technologist => "tecnologo",
            Education::Bachelor => "graduacao",
            Education::Master => "mestrado",
            Education::Doctorate => "doutorado",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Housing {
    #[serde(rename = "aluguel")]
    Rent,
    #[serde(rename = "financiada")]
    Mortgage,
    #[serde(rename = "propria")]
    Own,
    #[serde(rename = "outro")]
    Other,
}

impl Choice for Housing {
    const ALL: &'static [Self] = &[Housing::Rent, Housing::Mortgage, Housing::Own, Housing::Other];

    fn label(self) -> &'static str {
        match self {
            Housing::Rent => "aluguel",
            Housing::Mortgage => "financiada",
            Housing::Own => "propria",
            Housing::Other => "outro",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoanPurpose {
    #[serde(rename = "educacao")]
    Education,
    #[serde(rename = "saude")]
    Health,
    #[serde(rename = "empreendimento")]
    Venture,
    #[serde(rename = "pessoal")]
    Personal,
    #[serde(rename = "consolidacao_dividas")]
    DebtConsolidation,
    #[serde(rename = "reforma_residencial")]
    HomeImprovement,
}

impl Choice for LoanPurpose {
    const ALL: &'static [Self] = &[
        LoanPurpose::Education,
        LoanPurpose::Health,
        LoanPurpose::Venture,
        LoanPurpose::Personal,
        LoanPurpose::DebtConsolidation,
        LoanPurpose::HomeImprovement,
    ];

    fn label(self) -> &'static str {
        match self {
            LoanPurpose::Education => "educacao",
            LoanPurpose::Health => "saude",
            LoanPurpose::Venture => "empreendimento",
            LoanPurpose::Personal => "pessoal",
            LoanPurpose::DebtConsolidation => "consolidacao_dividas",
            LoanPurpose::HomeImprovement => "reforma_residencial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorDefault {
    #[serde(rename = "sim")]
    Yes,
    #[serde(rename = "nao")]
    No,
}

impl Choice for PriorDefault {
    const ALL: &'static [Self] = &[PriorDefault::Yes, PriorDefault::No];

    fn label(self) -> &'static str {
        match self {
            PriorDefault::Yes => "sim",
            PriorDefault::No => "nao",
        }
    }
}

/// A validated loan applicant.
///
/// Only `domain::validation::validate_applicant` builds these from untrusted
/// input, so every constraint in the field docs holds for any value in
/// circulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantRecord {
    /// `> 0`
    #[serde(rename = "idade")]
    pub age: i64,
    #[serde(rename = "genero")]
    pub gender: Gender,
    #[serde(rename = "escolaridade")]
    pub education: Education,
    /// `> 0`
    #[serde(rename = "renda_anual")]
    pub annual_income: f64,
    /// `>= 0`
    #[serde(rename = "experiencia_profissional_anos")]
    pub experience_years: i64,
    #[serde(rename = "tipo_moradia")]
    pub housing: Housing,
    /// `> 0`
    #[serde(rename = "valor_emprestimo")]
    pub loan_amount: f64,
    #[serde(rename = "finalidade_emprestimo")]
    pub loan_purpose: LoanPurpose,
    /// `> 0`
    #[serde(rename = "taxa_juros_emprestimo")]
    pub interest_rate: f64,
    /// Fraction of income committed to debt, in `[0, 1]`.
    #[serde(rename = "percentual_renda_comprometida")]
    pub income_committed: f64,
    /// `> 0`
    #[serde(rename = "historico_credito_anos")]
    pub credit_history_years: i64,
    /// `> 0`
    #[serde(rename = "score_credito")]
    pub credit_score: i64,
    #[serde(rename = "inadimplencia_anterior")]
    pub prior_default: PriorDefault,
    /// `> 0`
    #[serde(rename = "numero_parcelas")]
    pub installments: i64,
}

impl ApplicantRecord {
    /// The documented example applicant (also published in `/openapi.json`).
    pub fn example() -> Self {
        Self {
            age: 21,
            gender: Gender::Female,
            education: Education::HighSchool,
            annual_income: 12282.0,
            experience_years: 0,
            housing: Housing::Own,
            loan_amount: 1000.0,
            loan_purpose: LoanPurpose::Education,
            interest_rate: 11.14,
            income_committed: 0.08,
            credit_history_years: 2,
            credit_score: 504,
            prior_default: PriorDefault::Yes,
            installments: 36,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_label() {
        for g in Gender::ALL {
            assert_eq!(Gender::from_label(g.label()), Some(*g));
        }
        for p in LoanPurpose::ALL {
            assert_eq!(LoanPurpose::from_label(p.label()), Some(*p));
        }
        assert_eq!(Housing::from_label("outra"), None);
        assert_eq!(Education::labels().len(), 5);
    }

    #[test]
    fn example_serializes_with_wire_names_in_column_order() {
        let value = serde_json::to_value(ApplicantRecord::example()).unwrap();
        let obj = value.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        let mut expected = columns::ALL.to_vec();
        expected.sort_unstable();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, expected);
        assert_eq!(value["genero"], "feminino");
        assert_eq!(value["inadimplencia_anterior"], "sim");
        assert_eq!(value["renda_anual"], 12282.0);
    }
}
