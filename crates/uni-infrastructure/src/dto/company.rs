//! Wire representation of catalog records.
//!
//! The catalog endpoint forwards rows from the hosted dataset, so field names
//! carry spaces and units (`"Date Joined"`, `"Valuation ($B)"`). camelCase
//! names are accepted as aliases.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use uni_core::company::parse_investors;
use uni_core::{CompanyRecord, UniError};

/// A catalog row exactly as received.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyRecordDto {
    #[serde(rename = "Company", alias = "companyName", default)]
    pub company: Option<String>,
    #[serde(rename = "City", alias = "city", default)]
    pub city: Option<String>,
    #[serde(rename = "Country", alias = "country", default)]
    pub country: Option<String>,
    #[serde(rename = "Industry", alias = "industry", default)]
    pub industry: Option<String>,
    #[serde(rename = "Date Joined", alias = "dateJoined", default)]
    pub date_joined: Option<String>,
    #[serde(rename = "Valuation ($B)", alias = "valuationBillions", default)]
    pub valuation: Option<ValuationField>,
    #[serde(rename = "Select Investors", alias = "investors", default)]
    pub investors: Option<InvestorsField>,
}

/// Investors arrive either as one `", "`-joined string or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InvestorsField {
    List(Vec<String>),
    Joined(String),
}

/// Valuation arrives as a number of billions or as text such as `"$140"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValuationField {
    Number(f64),
    Text(String),
}

impl TryFrom<CompanyRecordDto> for CompanyRecord {
    type Error = UniError;

    fn try_from(dto: CompanyRecordDto) -> Result<Self, Self::Error> {
        let company_name = dto
            .company
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| UniError::invalid_response("catalog record without a company name"))?;

        let date_joined = dto
            .date_joined
            .as_deref()
            .ok_or_else(|| {
                UniError::invalid_response(format!("'{}' has no join date", company_name))
            })
            .and_then(|raw| {
                parse_date_joined(raw).ok_or_else(|| {
                    UniError::invalid_response(format!(
                        "'{}' has an unreadable join date '{}'",
                        company_name, raw
                    ))
                })
            })?;

        let valuation_billions = match dto.valuation {
            Some(ValuationField::Number(value)) => Some(value),
            Some(ValuationField::Text(raw)) => parse_valuation(&raw),
            None => None,
        }
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            UniError::invalid_response(format!("'{}' has no usable valuation", company_name))
        })?;

        let investors = match dto.investors {
            Some(InvestorsField::List(names)) => names
                .into_iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            Some(InvestorsField::Joined(raw)) => parse_investors(&raw),
            None => Vec::new(),
        };

        Ok(CompanyRecord {
            company_name,
            city: dto.city.unwrap_or_default(),
            country: dto.country.unwrap_or_default(),
            industry: dto.industry.unwrap_or_default(),
            date_joined,
            valuation_billions,
            investors,
        })
    }
}

/// Parses `YYYY-MM-DD`, `M/D/YYYY`, RFC 3339, or a bare ISO date-time.
pub fn parse_date_joined(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parses valuation text such as `"$140"`, `"12.5"` or `"$1.2B"`.
pub fn parse_valuation(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_start_matches('$').trim_end_matches(['B', 'b']).trim();
    trimmed.replace(',', "").parse().ok()
}
