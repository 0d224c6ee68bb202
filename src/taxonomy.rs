//! Sector taxonomy and NAF code classification
//!
//! One canonical table maps each business sector to the NAF code prefixes
//! it owns and the French/English keywords used by the text scorer. The
//! table is immutable at boot; user-defined sectors live in
//! [`crate::corrections::CustomSectorStore`] and carry no prefixes or
//! keywords (they only resolve through explicit corrections).

/// A business sector with its NAF prefixes and scoring keywords
#[derive(Debug, Clone, Copy)]
pub struct SectorDefinition {
    pub name: &'static str,
    pub naf_prefixes: &'static [&'static str],
    pub keywords: &'static [&'static str],
}

/// NAF codes that identify holding shells rather than operating companies.
/// A registry record carrying one of these is not a usable sector signal.
pub const NAF_BLACKLIST: &[&str] = &["7010Z", "6420Z"];

/// Sentinel returned when every stage ran but nothing matched
pub const SECTOR_NOT_FOUND: &str = "Non Trouvé";
/// Sentinel for a web trace without any keyword signal
pub const SECTOR_TO_VERIFY: &str = "À Vérifier / Hors Liste";
/// Sentinel for inputs filtered before resolution (personal emails)
pub const SECTOR_OUT_OF_SCOPE: &str = "Hors Scope";
/// Sentinel for an internal fault while processing one input
pub const SECTOR_ERROR: &str = "Erreur";

/// The built-in sector table. Declaration order is the tie-break order for
/// both prefix matching and keyword scoring.
pub const SECTORS: &[SectorDefinition] = &[
    SectorDefinition {
        name: "Agriculture / Livestock / Seafood",
        naf_prefixes: &["01", "02", "03"],
        keywords: &[
            "agriculture", "élevage", "pêche", "agricole", "ferme", "bio", "tracteur",
            "champs", "vigne", "viticulture", "horticulture", "maraichage", "bétail",
            "aquaculture", "farming", "livestock", "seafood", "crops",
        ],
    },
    SectorDefinition {
        name: "Banking",
        naf_prefixes: &["641"],
        keywords: &[
            "banque", "crédit", "bancaire", "compte", "livret", "cb", "bank", "banking",
            "loan", "credit", "bnp", "société générale", "crédit agricole", "bpce",
        ],
    },
    SectorDefinition {
        name: "Chemicals",
        naf_prefixes: &["20"],
        keywords: &[
            "chimie", "laboratoire", "molécules", "réactif", "polymère", "plastique",
            "chimique", "petrochemical", "chemicals", "chemistry", "lab", "solvay",
            "arkema", "air liquide",
        ],
    },
    SectorDefinition {
        name: "Communication / Media & Entertainment / Telecom",
        naf_prefixes: &["59", "60", "61", "63"],
        keywords: &[
            "télécom", "média", "publicité", "fibre", "internet", "presse", "journal",
            "tv", "radio", "marketing", "agence", "communication", "entertainment",
            "telecom", "broadcasting", "advertising", "media", "orange", "sfr",
            "bouygues", "free", "publicis", "havas",
        ],
    },
    SectorDefinition {
        name: "Construction",
        naf_prefixes: &["41", "42", "43"],
        keywords: &[
            "btp", "construction", "bâtiment", "génie civil", "infrastructure",
            "travaux", "architecture", "maçonnerie", "électicité", "plomberie",
            "architect", "builder", "contractor", "civil", "renovation", "vinci",
            "eiffage", "bouygues construction",
        ],
    },
    SectorDefinition {
        name: "Consulting / IT Services",
        naf_prefixes: &["62", "631", "582", "702", "692", "7112", "712", "732", "74"],
        keywords: &[
            "conseil", "consulting", "esn", "stratégie", "audit", "expertise",
            "ingénierie", "rub", "management", "digital", "transformation",
            "it services", "système d'information", "data", "advisory", "capgemini",
            "deloitte", "kpmg", "pwc", "mckinsey", "bain", "bcg", "accenture",
            "sogeti", "sopra", "wavestone", "alteca", "umanis",
        ],
    },
    SectorDefinition {
        name: "CPG (Consumer Packaged Goods)",
        naf_prefixes: &["204"],
        keywords: &[
            "fmcg", "biens de consommation", "hygiène", "produits ménagers",
            "cosmétique", "beauté", "parfum", "shampoing", "savon", "lessive", "cpg",
            "consumer goods", "l'oréal", "procter", "gamble", "unilever", "danone",
            "nestlé", "henkel",
        ],
    },
    SectorDefinition {
        name: "Education",
        naf_prefixes: &["85"],
        keywords: &[
            "éducation", "formation", "école", "université", "training", "learning",
            "elearning", "edtech", "campus", "formation continue", "school",
            "university", "academy", "college",
        ],
    },
    SectorDefinition {
        name: "Energy / Utilities",
        naf_prefixes: &["35", "36", "37", "38", "39"],
        keywords: &[
            "énergie", "électricité", "gaz", "eau", "déchets", "environnement",
            "recyclage", "solaire", "éolien", "nucléaire", "oil", "petrol",
            "renewables", "green", "carbon", "hydrogen", "edf", "engie", "total",
            "veolia", "suez",
        ],
    },
    SectorDefinition {
        name: "Finance / Real Estate",
        naf_prefixes: &["64", "66", "68"],
        keywords: &[
            "finance", "immobilier", "investissement", "gestion d'actifs", "courtier",
            "syndic", "promoteur", "real estate", "realty", "property", "logement",
            "immo", "wealth", "fintech", "payment", "trading", "crypto", "blockchain",
            "vc", "private equity", "fund", "foncia", "nexity",
        ],
    },
    SectorDefinition {
        name: "Food / Beverages",
        naf_prefixes: &["10", "11"],
        keywords: &[
            "agroalimentaire", "aliments", "boissons", "food", "beverage", "vin",
            "spiritueux", "bière", "champagne", "nutrition", "snack", "dairy",
            "laitier", "viande", "boulangerie", "traiteur",
        ],
    },
    SectorDefinition {
        name: "Healthcare / Medical Services",
        naf_prefixes: &["86", "87", "88"],
        keywords: &[
            "santé", "clinique", "hôpital", "soins", "médecin", "infirmier", "ehpad",
            "médical", "chirurgie", "patient", "healthcare", "medical", "hospital",
            "clinic", "care", "doctor", "diagnostic", "radiologie", "dentaire", "kine",
            "ramsay", "elsan",
        ],
    },
    SectorDefinition {
        name: "Hotels / Restaurants",
        naf_prefixes: &["55", "56"],
        keywords: &[
            "hôtel", "restaurant", "tourisme", "hébergement", "camping", "voyage",
            "bar", "café", "brasserie", "cuisine", "hotel", "hospitality", "tourism",
            "catering", "accor", "club med", "sodexo", "elior",
        ],
    },
    SectorDefinition {
        name: "Insurance / Mutual Health Insurance",
        naf_prefixes: &["65"],
        keywords: &[
            "assurance", "mutuelle", "courtage", "assureur", "prévoyance", "risques",
            "insurance", "underwriting", "axa", "allianz", "generali", "maif",
            "macif", "groupama", "malakoff",
        ],
    },
    SectorDefinition {
        name: "Luxury",
        naf_prefixes: &["141", "142", "151", "152"],
        keywords: &[
            "luxe", "prestige", "haute couture", "joaillerie", "maroquinerie",
            "palace", "luxury", "fashion", "jewelry", "premium", "high-end", "mode",
            "vêtement", "chaussures", "shoes", "wear", "apparel", "lvmh", "kering",
            "hermès", "chanel", "dior", "vuitton", "gucci", "prada",
        ],
    },
    SectorDefinition {
        name: "Manufacturing / Industry",
        naf_prefixes: &[
            "13", "14", "15", "16", "17", "22", "23", "24", "25", "26", "27", "28",
            "29", "30", "31", "32", "33",
        ],
        keywords: &[
            "industrie", "usine", "fabrication", "mécanique", "métallurgie",
            "plasturgie", "assemblage", "production", "machine", "outil",
            "industriel", "manufacturing", "industry", "factory", "plant", "metal",
            "machinery", "automotive", "aéronautique", "aerospace", "defense",
            "textile", "imprimerie", "packaging", "saint-gobain", "schneider",
            "legrand", "michelin",
        ],
    },
    SectorDefinition {
        name: "Not For Profit",
        naf_prefixes: &["94", "91"],
        keywords: &[
            "association", "fondation", "ong", "non-profit", "charity", "bénévole",
            "social", "humanitaire", "syndicat", "union", "club", "croix rouge",
            "secours populaire",
        ],
    },
    SectorDefinition {
        name: "Pharmaceutics",
        naf_prefixes: &["21"],
        keywords: &[
            "pharmacie", "médicament", "biotech", "laboratoire", "vaccin",
            "recherche", "molécule", "thérapie", "pharmaceutical", "pharma", "drug",
            "biotechnology", "medicine", "lifescience", "sanofi", "servier",
            "pfizer", "moderna",
        ],
    },
    SectorDefinition {
        name: "Public administration & government",
        naf_prefixes: &["84"],
        keywords: &[
            "mairie", "préfecture", "ministère", "collectivité", "public", "etat",
            "government", "administration", "caisse", "caf", "urssaf", "pole emploi",
            "france travail", "ambassade", "consulat",
        ],
    },
    SectorDefinition {
        name: "Retail",
        naf_prefixes: &["45", "46", "47"],
        keywords: &[
            "commerce", "vente", "magasin", "boutique", "supermarché", "distribution",
            "retail", "store", "shop", "e-commerce", "marketplace", "grossiste",
            "grand magasin", "shopping", "mall", "outlet", "franchise", "carrefour",
            "auchan", "leclerc", "decathlon", "fnac", "darty", "amazon", "cdiscount",
        ],
    },
    SectorDefinition {
        name: "Tech / Software",
        naf_prefixes: &["582", "6201", "6312", "262"],
        keywords: &[
            "logiciel", "saas", "tech", "software", "application", "ia",
            "intelligence artificielle", "cloud", "développement", "web", "app",
            "cybersecurity", "platform", "technology", "developer", "electronics",
            "hardware", "computer", "start-up", "google", "microsoft", "apple",
            "meta", "aws", "salesforce", "sap", "oracle",
        ],
    },
    SectorDefinition {
        name: "Transportation, Logistics & Storage",
        naf_prefixes: &["49", "50", "51", "52", "53"],
        keywords: &[
            "transport", "logistique", "fret", "livraison", "messagerie", "entrepôt",
            "supply chain", "shipping", "transit", "colis", "airline", "aérien",
            "avion", "bateau", "compagnie aérienne", "rail", "ferroviaire",
            "maritime", "port", "sncf", "air france", "maersk", "cma cgm", "dhl",
            "fedex", "ups",
        ],
    },
];

/// Names of all built-in sectors, in declaration order
pub fn builtin_sector_names() -> Vec<String> {
    SECTORS.iter().map(|s| s.name.to_string()).collect()
}

/// Whether a sector name belongs to the built-in taxonomy
pub fn is_builtin_sector(name: &str) -> bool {
    SECTORS.iter().any(|s| s.name == name)
}

/// Map a NAF/APE industry code to a sector.
///
/// Separators are stripped before matching ("62.02A" and "6202A" are the
/// same code). Among all sectors owning a matching prefix, the longest
/// prefix wins; equal lengths keep the first sector in declaration order.
/// Blacklisted holding codes never classify.
pub fn classify_by_code(code: &str) -> Option<&'static str> {
    if code.is_empty() {
        return None;
    }

    let clean: String = code.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if clean.is_empty() {
        return None;
    }

    if NAF_BLACKLIST.iter().any(|b| clean.eq_ignore_ascii_case(b)) {
        return None;
    }

    let mut best_sector = None;
    let mut max_prefix_len = 0;
    for sector in SECTORS {
        for prefix in sector.naf_prefixes {
            if clean.starts_with(prefix) && prefix.len() > max_prefix_len {
                max_prefix_len = prefix.len();
                best_sector = Some(sector.name);
            }
        }
    }
    best_sector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_plain_prefix() {
        assert_eq!(classify_by_code("8610Z"), Some("Healthcare / Medical Services"));
        assert_eq!(classify_by_code("4711D"), Some("Retail"));
        assert_eq!(classify_by_code("0111Z"), Some("Agriculture / Livestock / Seafood"));
    }

    #[test]
    fn test_classify_strips_separators() {
        assert_eq!(classify_by_code("86.10Z"), classify_by_code("8610Z"));
        assert_eq!(classify_by_code("62.02A"), Some("Consulting / IT Services"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        // "64" belongs to Finance / Real Estate, "641" to Banking.
        // A 641x code must resolve to Banking even though Finance matches too.
        assert_eq!(classify_by_code("6419Z"), Some("Banking"));
        // A 64xx code outside 641 stays Finance.
        assert_eq!(classify_by_code("6430Z"), Some("Finance / Real Estate"));
    }

    #[test]
    fn test_tech_beats_consulting_on_software_publishing() {
        // "582" is listed by both Consulting and Tech at the same length.
        // First declaration wins: Consulting comes first in the table.
        assert_eq!(classify_by_code("5829C"), Some("Consulting / IT Services"));
        // "6201" (length 4) beats Consulting's "62" (length 2).
        assert_eq!(classify_by_code("6201Z"), Some("Tech / Software"));
    }

    #[test]
    fn test_blacklisted_holding_codes() {
        assert_eq!(classify_by_code("7010Z"), None);
        assert_eq!(classify_by_code("6420Z"), None);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(classify_by_code(""), None);
        assert_eq!(classify_by_code("9999Z"), None);
        assert_eq!(classify_by_code(".."), None);
    }

    #[test]
    fn test_sector_names_unique() {
        let names = builtin_sector_names();
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 22);
    }

    #[test]
    fn test_is_builtin_sector() {
        assert!(is_builtin_sector("Tech / Software"));
        assert!(is_builtin_sector("Luxury"));
        assert!(!is_builtin_sector("Custom Widgets"));
        assert!(!is_builtin_sector(SECTOR_NOT_FOUND));
    }
}
