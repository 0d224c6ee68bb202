//! Hardcoded company overrides
//!
//! A curated safety net of well-known companies whose sector, official name
//! and location are pinned regardless of what the registry or the web says.
//! Lookups go through an aggressive key normalization (uppercase, strip
//! spaces/periods/hyphens) so "Coca-Cola", "COCA COLA" and "cocacola" all
//! resolve to the same record, plus a small hand-curated alias table for
//! misspellings that normalization alone cannot collapse.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

/// A pinned company record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideRecord {
    /// Canonical lookup key (uppercase display form)
    pub key: &'static str,
    pub sector: &'static str,
    pub official_name: &'static str,
    /// Empty string means unknown; a populated address short-circuits the cascade
    pub address: &'static str,
    pub region: &'static str,
    pub headcount: &'static str,
    pub siren: Option<&'static str>,
}

/// Normalize a raw name into an override lookup key:
/// uppercase with spaces, periods and hyphens stripped.
pub fn normalize_key(name: &str) -> String {
    name.to_uppercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect()
}

macro_rules! ov {
    ($key:expr, $sector:expr, $official:expr, $address:expr, $region:expr, $headcount:expr) => {
        OverrideRecord {
            key: $key,
            sector: $sector,
            official_name: $official,
            address: $address,
            region: $region,
            headcount: $headcount,
            siren: None,
        }
    };
    ($key:expr, $sector:expr, $official:expr, $address:expr, $region:expr, $headcount:expr, $siren:expr) => {
        OverrideRecord {
            key: $key,
            sector: $sector,
            official_name: $official,
            address: $address,
            region: $region,
            headcount: $headcount,
            siren: Some($siren),
        }
    };
}

/// The global override table
pub const GLOBAL_OVERRIDES: &[OverrideRecord] = &[
    // Global tech
    ov!("APPLE", "Tech / Software", "APPLE INC.", "Cupertino, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("GOOGLE", "Tech / Software", "ALPHABET INC.", "Mountain View, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("MICROSOFT", "Tech / Software", "MICROSOFT CORP", "Redmond, WA (USA)", "Monde", "10 000+ salariés"),
    ov!("AMAZON", "Tech / Software", "AMAZON.COM INC", "Seattle, WA (USA)", "Monde", "10 000+ salariés"),
    ov!("META", "Tech / Software", "META PLATFORMS", "Menlo Park, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("FACEBOOK", "Tech / Software", "META PLATFORMS", "Menlo Park, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("SAMSUNG", "Tech / Software", "SAMSUNG ELECTRONICS", "Suwon (South Korea)", "Monde", "10 000+ salariés"),
    ov!("NVIDIA", "Tech / Software", "NVIDIA CORP", "Santa Clara, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("ADOBE", "Tech / Software", "ADOBE INC.", "San Jose, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("SALESFORCE", "Tech / Software", "SALESFORCE", "San Francisco, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("SPOTIFY", "Tech / Software", "SPOTIFY TECHNOLOGY", "Stockholm (Sweden)", "Monde", "5 000+ salariés"),
    ov!("UBER", "Tech / Software", "UBER TECHNOLOGIES", "San Francisco, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("AIRBNB", "Tech / Software", "AIRBNB INC.", "San Francisco, CA (USA)", "Monde", "5 000+ salariés"),
    ov!("ZOOM", "Tech / Software", "ZOOM VIDEO COMMUNICATIONS", "San Jose, CA (USA)", "Monde", "5 000+ salariés"),
    ov!("SLACK", "Tech / Software", "SALESFORCE (SLACK)", "San Francisco, CA (USA)", "Monde", "1 000+ salariés"),
    ov!("XIAOMI", "Tech / Software", "XIAOMI CORP", "Beijing (China)", "Monde", "10 000+ salariés"),
    ov!("OPPO", "Tech / Software", "OPPO ELECTRONICS", "Dongguan (China)", "Monde", "10 000+ salariés"),
    ov!("HUAWEI", "Tech / Software", "HUAWEI TECHNOLOGIES", "Shenzhen (China)", "Monde", "10 000+ salariés"),
    ov!("ONEPLUS", "Tech / Software", "ONEPLUS TECHNOLOGY", "Shenzhen (China)", "Monde", "5 000+ salariés"),
    ov!("VISIATIV", "Tech / Software", "VISIATIV", "Charbonnières-les-Bains (France)", "Auvergne-Rhône-Alpes", "1 000+ salariés"),
    ov!("AMOOBI", "Tech / Software", "AMOOBI", "N/A (International)", "Monde", "10-50 salariés"),
    // Media / telecom
    ov!("NETFLIX", "Communication / Media & Entertainment / Telecom", "NETFLIX INC.", "Los Gatos, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("DISNEY", "Communication / Media & Entertainment / Telecom", "THE WALT DISNEY COMPANY", "Burbank, CA (USA)", "Monde", "10 000+ salariés"),
    ov!("NINTENDO", "Communication / Media & Entertainment / Telecom", "NINTENDO CO., LTD", "Kyoto (Japan)", "Monde", "5 000+ salariés"),
    ov!("ORANGE", "Communication / Media & Entertainment / Telecom", "ORANGE SA", "Issy-les-Moulineaux (France)", "Île-de-France", "10 000+ salariés"),
    ov!("SFR", "Communication / Media & Entertainment / Telecom", "SFR", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("FREE", "Communication / Media & Entertainment / Telecom", "ILIAD (FREE)", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("ILIAD", "Communication / Media & Entertainment / Telecom", "ILIAD (FREE)", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("BOUYGUES TELECOM", "Communication / Media & Entertainment / Telecom", "BOUYGUES TELECOM", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("TDF", "Communication / Media & Entertainment / Telecom", "TDF", "Montrouge (France)", "Île-de-France", "1 000+ salariés"),
    // Construction
    ov!("BOUYGUES", "Construction", "BOUYGUES SA", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    // Luxury
    ov!("LVMH", "Luxury", "LVMH MOET HENNESSY", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("CHRISTIAN DIOR", "Luxury", "CHRISTIAN DIOR SE", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("LOUIS VUITTON", "Luxury", "LOUIS VUITTON MALLETIER", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("CHRISTIAN LOUBOUTIN", "Luxury", "CHRISTIAN LOUBOUTIN", "Paris (France)", "Île-de-France", "1 000+ salariés"),
    ov!("CHANEL", "Luxury", "CHANEL SAS", "Neuilly-sur-Seine (France)", "Île-de-France", "10 000+ salariés"),
    ov!("HERMES", "Luxury", "HERMES INTERNATIONAL", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("GUCCI", "Luxury", "GUCCI", "Florence (Italy)", "Monde", "10 000+ salariés"),
    ov!("PRADA", "Luxury", "PRADA SPA", "Milan (Italy)", "Monde", "10 000+ salariés"),
    ov!("LONGCHAMP", "Luxury", "LONGCHAMP SAS", "Paris (France)", "Île-de-France", "1 000+ salariés"),
    // Consulting
    ov!("CAPGEMINI", "Consulting / IT Services", "CAPGEMINI SE", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("KPMG", "Consulting / IT Services", "KPMG S.A", "Paris La Défense (France)", "Île-de-France", "10 000+ salariés"),
    ov!("DELOITTE", "Consulting / IT Services", "DELOITTE SAS", "Paris La Défense (France)", "Île-de-France", "10 000+ salariés"),
    ov!("EY", "Consulting / IT Services", "ERNST & YOUNG", "Paris La Défense (France)", "Île-de-France", "10 000+ salariés"),
    ov!("PWC", "Consulting / IT Services", "PWC FRANCE", "Neuilly-sur-Seine (France)", "Île-de-France", "10 000+ salariés"),
    ov!("ACCENTURE", "Consulting / IT Services", "ACCENTURE", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    // Banking
    ov!("BNP PARIBAS", "Banking", "BNP PARIBAS SA", "Paris (France)", "Île-de-France", "10 000+ salariés", "662042449"),
    ov!("SOCIETE GENERALE", "Banking", "SOCIETE GENERALE SA", "Paris La Défense (France)", "Île-de-France", "10 000+ salariés"),
    // Retail
    ov!("GALERIES LAFAYETTE", "Retail", "GALERIES LAFAYETTE", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("PRINTEMPS", "Retail", "PRINTEMPS", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("CARREFOUR", "Retail", "CARREFOUR SA", "Massy (France)", "Île-de-France", "10 000+ salariés"),
    ov!("AUCHAN", "Retail", "AUCHAN RETAIL", "Croix (France)", "Hauts-de-France", "10 000+ salariés"),
    ov!("LECLERC", "Retail", "E.LECLERC", "Ivry-sur-Seine (France)", "Île-de-France", "10 000+ salariés"),
    ov!("INTERMARCHE", "Retail", "ITM ENTREPRISES", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("INTERMARCHÉ", "Retail", "ITM ENTREPRISES", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("LIDL", "Retail", "LIDL STIFTUNG", "Neckarsulm (Germany)", "Monde", "10 000+ salariés"),
    ov!("ALDI", "Retail", "ALDI EINKAUF", "Essen (Germany)", "Monde", "10 000+ salariés"),
    ov!("NETTO", "Retail", "NETTO MARKEN-DISCOUNT", "Germany", "Monde", "5 000+ salariés"),
    ov!("ACTION", "Retail", "ACTION B.V.", "Zwaagdijk (Netherlands)", "Monde", "10 000+ salariés"),
    ov!("MONOPRIX", "Retail", "MONOPRIX", "Clichy (France)", "Île-de-France", "10 000+ salariés"),
    ov!("DECATHLON", "Retail", "DECATHLON SE", "Villeneuve-d'Ascq (France)", "Hauts-de-France", "10 000+ salariés"),
    ov!("NIKE", "Retail", "NIKE INC.", "Beaverton, OR (USA)", "Monde", "10 000+ salariés"),
    ov!("SERFIGROUP", "Retail", "SERFI INTERNATIONAL", "Nice (France)", "Provence-Alpes-Côte d'Azur", "20-49 salariés"),
    ov!("SERFI INTERNATIONAL", "Retail", "SERFI INTERNATIONAL", "Nice (France)", "Provence-Alpes-Côte d'Azur", "20-49 salariés"),
    // Manufacturing / auto / aero
    ov!("TESLA", "Manufacturing / Industry", "TESLA INC.", "Austin, TX (USA)", "Monde", "10 000+ salariés"),
    ov!("BMW", "Manufacturing / Industry", "BMW AG", "Munich (Germany)", "Monde", "10 000+ salariés"),
    ov!("MERCEDES", "Manufacturing / Industry", "MERCEDES-BENZ GROUP", "Stuttgart (Germany)", "Monde", "10 000+ salariés"),
    ov!("TOYOTA", "Manufacturing / Industry", "TOYOTA MOTOR CORP", "Toyota City (Japan)", "Monde", "10 000+ salariés"),
    ov!("VOLKSWAGEN", "Manufacturing / Industry", "VOLKSWAGEN AG", "Wolfsburg (Germany)", "Monde", "10 000+ salariés"),
    ov!("PHILIPS", "Manufacturing / Industry", "KONINKLIJKE PHILIPS", "Amsterdam (Netherlands)", "Monde", "10 000+ salariés"),
    ov!("SAFRAN", "Manufacturing / Industry", "SAFRAN SA", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    ov!("SAFRAN AERO BOOSTERS", "Manufacturing / Industry", "SAFRAN AERO BOOSTERS", "Herstal (Belgium)", "Monde", "1 000+ salariés"),
    ov!("SYMBIO", "Manufacturing / Industry", "SYMBIO", "Vénissieux (France)", "Auvergne-Rhône-Alpes", "500+ salariés"),
    // Food / beverages
    ov!("COCA COLA", "Food / Beverages", "THE COCA-COLA COMPANY", "Atlanta, GA (USA)", "Monde", "10 000+ salariés"),
    ov!("PEPSI", "Food / Beverages", "PEPSICO INC.", "Harrison, NY (USA)", "Monde", "10 000+ salariés"),
    ov!("DANONE", "Food / Beverages", "DANONE", "Paris (France)", "Île-de-France", "10 000+ salariés", "552032534"),
    ov!("PERNOD RICARD", "Food / Beverages", "PERNOD RICARD", "Paris (France)", "Île-de-France", "10 000+ salariés"),
    // Pharma
    ov!("PFIZER", "Pharmaceutics", "PFIZER INC.", "New York, NY (USA)", "Monde", "10 000+ salariés"),
    // Insurance
    ov!("APRIL", "Insurance / Mutual Health Insurance", "APRIL", "Lyon (France)", "Auvergne-Rhône-Alpes", "1 000+ salariés"),
    // Logistics
    ov!("LA POSTE", "Transportation, Logistics & Storage", "LA POSTE", "Issy-les-Moulineaux (France)", "Île-de-France", "10 000+ salariés"),
    ov!("GROUPE LA POSTE", "Transportation, Logistics & Storage", "LA POSTE", "Issy-les-Moulineaux (France)", "Île-de-France", "10 000+ salariés"),
];

/// Hand-curated aliases: misspellings and variants that key normalization
/// alone does not collapse, mapped to the canonical override key.
const ALIASES: &[(&str, &str)] = &[
    ("SAFRAN AERO BOSOTERS", "SAFRAN AERO BOOSTERS"),
    ("ALPHABET", "GOOGLE"),
    ("SOCGEN", "SOCIETE GENERALE"),
    ("ERNST & YOUNG", "EY"),
    ("ERNST AND YOUNG", "EY"),
];

static OVERRIDE_INDEX: Lazy<HashMap<String, &'static OverrideRecord>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for record in GLOBAL_OVERRIDES {
        index.insert(normalize_key(record.key), record);
    }
    for (alias, canonical) in ALIASES {
        let target = normalize_key(canonical);
        if let Some(record) = index.get(&target).copied() {
            index.insert(normalize_key(alias), record);
        }
    }
    index
});

/// Look up an override record by raw name.
/// All spellings that normalize to the same key resolve identically.
pub fn lookup(name: &str) -> Option<&'static OverrideRecord> {
    let key = normalize_key(name);
    if key.is_empty() {
        return None;
    }
    let hit = OVERRIDE_INDEX.get(&key).copied();
    if let Some(record) = hit {
        debug!("Override hit: '{}' -> {}", name, record.official_name);
    }
    hit
}
