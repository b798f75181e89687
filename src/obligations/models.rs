use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::CalendarError;
use crate::utils::rolled_date;

/// Fiscal regimes with their own obligation set
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(try_from = "String")]
pub enum Regime {
    #[default]
    #[serde(rename = "general")]
    General, // Régimen General de Ley (personas morales)
    #[serde(rename = "resico")]
    SimplifiedTrust, // Régimen Simplificado de Confianza
    #[serde(rename = "persona_fisica")]
    Individual, // Personas físicas
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::General, Regime::SimplifiedTrust, Regime::Individual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::General => "general",
            Regime::SimplifiedTrust => "resico",
            Regime::Individual => "persona_fisica",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Regime::General => "Régimen General",
            Regime::SimplifiedTrust => "RESICO",
            Regime::Individual => "Persona Física",
        }
    }

    pub fn person_type(&self) -> PersonType {
        match self {
            Regime::Individual => PersonType::Individual,
            _ => PersonType::Entity,
        }
    }

    /// Parse a regime name, falling back to `General` for anything unknown.
    pub fn parse_or_general(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            debug!("Unknown regime '{}', using general", s);
            Regime::General
        })
    }
}

impl FromStr for Regime {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "general" => Ok(Regime::General),
            "resico" | "simplified_trust" => Ok(Regime::SimplifiedTrust),
            "persona_fisica" | "individual" | "pf" => Ok(Regime::Individual),
            _ => Err(CalendarError::Parse(format!("unknown regime '{}'", s))),
        }
    }
}

impl TryFrom<String> for Regime {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a template recurs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Periodicity {
    #[serde(rename = "mensual")]
    Monthly,
    #[serde(rename = "bimestral")]
    Bimonthly,
    #[serde(rename = "anual")]
    Annual,
}

impl Periodicity {
    pub const ALL: [Periodicity; 3] = [
        Periodicity::Monthly,
        Periodicity::Bimonthly,
        Periodicity::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Monthly => "mensual",
            Periodicity::Bimonthly => "bimestral",
            Periodicity::Annual => "anual",
        }
    }
}

impl FromStr for Periodicity {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mensual" | "monthly" => Ok(Periodicity::Monthly),
            "bimestral" | "bimonthly" => Ok(Periodicity::Bimonthly),
            "anual" | "annual" | "yearly" => Ok(Periodicity::Annual),
            _ => Err(CalendarError::Parse(format!("unknown periodicity '{}'", s))),
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the taxpayer has to do by the deadline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObligationKind {
    #[serde(rename = "declaracion")]
    Declaration,
    #[serde(rename = "pago")]
    Payment,
    #[serde(rename = "aviso")]
    Notice,
}

impl ObligationKind {
    pub const ALL: [ObligationKind; 3] = [
        ObligationKind::Declaration,
        ObligationKind::Payment,
        ObligationKind::Notice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObligationKind::Declaration => "declaracion",
            ObligationKind::Payment => "pago",
            ObligationKind::Notice => "aviso",
        }
    }
}

impl FromStr for ObligationKind {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "declaracion" | "declaración" | "declaration" => Ok(ObligationKind::Declaration),
            "pago" | "payment" => Ok(ObligationKind::Payment),
            "aviso" | "notice" => Ok(ObligationKind::Notice),
            _ => Err(CalendarError::Parse(format!("unknown obligation kind '{}'", s))),
        }
    }
}

impl fmt::Display for ObligationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persona física / persona moral
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PersonType {
    #[serde(rename = "fisica")]
    Individual,
    #[serde(rename = "moral")]
    Entity,
}

impl PersonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonType::Individual => "fisica",
            PersonType::Entity => "moral",
        }
    }
}

/// When a template falls due
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DeadlineRule {
    /// Day of the month following the reporting period (monthly, bimonthly)
    Recurring {
        #[serde(rename = "diaLimite")]
        due_day: u32,
    },
    /// Fixed calendar date every year
    Annual {
        #[serde(rename = "mes")]
        due_month: u32,
        #[serde(rename = "dia")]
        due_day: u32,
    },
}

impl DeadlineRule {
    /// Deadline for the reporting period `(year, month)`.
    ///
    /// Recurring obligations for month `m` are due in month `m + 1` (January
    /// IVA is filed by February 17; December rolls into January of the next
    /// year). Annual obligations are due on their fixed date in `year`.
    /// Out-of-range months or days roll over; `None` only if the result is
    /// outside the representable calendar.
    pub fn due_date_for_period(&self, year: i32, month: u32) -> Option<NaiveDate> {
        match *self {
            DeadlineRule::Recurring { due_day } => {
                rolled_date(year, i64::from(month), i64::from(due_day))
            }
            DeadlineRule::Annual { due_month, due_day } => {
                rolled_date(year, i64::from(due_month) - 1, i64::from(due_day))
            }
        }
    }

    pub fn due_day(&self) -> u32 {
        match *self {
            DeadlineRule::Recurring { due_day } | DeadlineRule::Annual { due_day, .. } => due_day,
        }
    }

    pub fn due_month(&self) -> Option<u32> {
        match *self {
            DeadlineRule::Recurring { .. } => None,
            DeadlineRule::Annual { due_month, .. } => Some(due_month),
        }
    }
}

/// Static catalog entry describing one SAT obligation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ObligationTemplate {
    pub id: &'static str,
    #[serde(rename = "nombre")]
    pub name: &'static str,
    #[serde(rename = "descripcion")]
    pub description: &'static str,
    #[serde(rename = "tipo")]
    pub kind: ObligationKind,
    #[serde(flatten)]
    pub deadline: DeadlineRule,
    #[serde(rename = "forma")]
    pub form_code: &'static str,
}

/// A template expanded for a concrete period, owned by the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObligationInstance {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipo")]
    pub kind: ObligationKind,
    #[serde(flatten)]
    pub deadline: DeadlineRule,
    #[serde(rename = "forma")]
    pub form_code: String,
    #[serde(rename = "fechaLimite")]
    pub due_date: NaiveDate,
    #[serde(rename = "regimen")]
    pub regime: Regime,
    #[serde(rename = "periodicidad")]
    pub periodicity: Periodicity,
    #[serde(rename = "personaTipo")]
    pub person_type: PersonType,
    #[serde(rename = "obligatorio")]
    pub mandatory: bool,
    #[serde(rename = "diasRestantes")]
    pub days_remaining: i64,
}

impl ObligationInstance {
    pub fn from_template(
        template: &ObligationTemplate,
        regime: Regime,
        periodicity: Periodicity,
        due_date: NaiveDate,
        days_remaining: i64,
    ) -> Self {
        ObligationInstance {
            id: template.id.to_string(),
            name: template.name.to_string(),
            description: template.description.to_string(),
            kind: template.kind,
            deadline: template.deadline,
            form_code: template.form_code.to_string(),
            due_date,
            regime,
            periodicity,
            person_type: regime.person_type(),
            mandatory: true,
            days_remaining,
        }
    }
}

/// Filters accepted by every query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryOptions {
    pub regime: Regime,
    pub kind: Option<ObligationKind>,
    pub periodicity: Option<Periodicity>,
}

impl QueryOptions {
    pub fn for_regime(regime: Regime) -> Self {
        QueryOptions {
            regime,
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: ObligationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_periodicity(mut self, periodicity: Periodicity) -> Self {
        self.periodicity = Some(periodicity);
        self
    }

    pub(crate) fn wants_periodicity(&self, periodicity: Periodicity) -> bool {
        self.periodicity.map_or(true, |p| p == periodicity)
    }

    pub(crate) fn wants_kind(&self, kind: ObligationKind) -> bool {
        self.kind.map_or(true, |k| k == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_parsing_accepts_both_vocabularies() {
        assert_eq!("resico".parse::<Regime>().unwrap(), Regime::SimplifiedTrust);
        assert_eq!(
            "simplified-trust".parse::<Regime>().unwrap(),
            Regime::SimplifiedTrust
        );
        assert_eq!(
            "PERSONA_FISICA".parse::<Regime>().unwrap(),
            Regime::Individual
        );
        assert_eq!("individual".parse::<Regime>().unwrap(), Regime::Individual);
        assert!("sueldos".parse::<Regime>().is_err());
    }

    #[test]
    fn test_regime_fallback() {
        assert_eq!(Regime::parse_or_general("plataformas"), Regime::General);
        assert_eq!(Regime::parse_or_general("resico"), Regime::SimplifiedTrust);
    }

    #[test]
    fn test_person_type_follows_regime() {
        assert_eq!(Regime::Individual.person_type(), PersonType::Individual);
        assert_eq!(Regime::General.person_type(), PersonType::Entity);
        assert_eq!(Regime::SimplifiedTrust.person_type(), PersonType::Entity);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(
            "Declaración".parse::<ObligationKind>().unwrap(),
            ObligationKind::Declaration
        );
        assert_eq!(
            "payment".parse::<ObligationKind>().unwrap(),
            ObligationKind::Payment
        );
        assert!("multa".parse::<ObligationKind>().is_err());
    }

    #[test]
    fn test_recurring_deadline_lands_in_following_month() {
        let rule = DeadlineRule::Recurring { due_day: 17 };
        assert_eq!(
            rule.due_date_for_period(2024, 1),
            NaiveDate::from_ymd_opt(2024, 2, 17)
        );
        assert_eq!(
            rule.due_date_for_period(2024, 12),
            NaiveDate::from_ymd_opt(2025, 1, 17)
        );
    }

    #[test]
    fn test_annual_deadline_is_fixed_date() {
        let rule = DeadlineRule::Annual {
            due_month: 3,
            due_day: 31,
        };
        assert_eq!(
            rule.due_date_for_period(2024, 3),
            NaiveDate::from_ymd_opt(2024, 3, 31)
        );
        assert_eq!(rule.due_month(), Some(3));
        assert_eq!(rule.due_day(), 31);
    }

    #[test]
    fn test_instance_serializes_with_spanish_field_names() {
        let template = ObligationTemplate {
            id: "iva-mensual",
            name: "Declaración mensual de IVA",
            description: "Declaración mensual del Impuesto al Valor Agregado",
            kind: ObligationKind::Declaration,
            deadline: DeadlineRule::Recurring { due_day: 17 },
            form_code: "A-29",
        };
        let instance = ObligationInstance::from_template(
            &template,
            Regime::General,
            Periodicity::Monthly,
            NaiveDate::from_ymd_opt(2024, 2, 17).unwrap(),
            5,
        );

        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["fechaLimite"], "2024-02-17");
        assert_eq!(json["tipo"], "declaracion");
        assert_eq!(json["diaLimite"], 17);
        assert_eq!(json["regimen"], "general");
        assert_eq!(json["periodicidad"], "mensual");
        assert_eq!(json["personaTipo"], "moral");
        assert_eq!(json["obligatorio"], true);
        assert_eq!(json["diasRestantes"], 5);

        let back: ObligationInstance = serde_json::from_value(json).unwrap();
        assert_eq!(back, instance);
    }
}
