//! Static entity code to display name table.
//!
//! The table is compiled in, sorted by code, and never mutated; lookups are a
//! binary search over a `'static` slice.

/// Label used when an entity code is blank.
pub const UNKNOWN_ENTITY_LABEL: &str = "unknown";

/// `(code, display name)` pairs, strictly ascending by code.
static ENTITY_LABELS: &[(&str, &str)] = &[
    ("AE", "United Arab Emirates"),
    ("AF", "Afghanistan"),
    ("AR", "Argentina"),
    ("AT", "Austria"),
    ("AU", "Australia"),
    ("BD", "Bangladesh"),
    ("BE", "Belgium"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("CL", "Chile"),
    ("CN", "China"),
    ("CO", "Colombia"),
    ("CZ", "Czechia"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("EG", "Egypt"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("GR", "Greece"),
    ("ID", "Indonesia"),
    ("IE", "Ireland"),
    ("IL", "Israel"),
    ("IN", "India"),
    ("IR", "Iran"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("MX", "Mexico"),
    ("MY", "Malaysia"),
    ("NG", "Nigeria"),
    ("NL", "Netherlands"),
    ("NO", "Norway"),
    ("NZ", "New Zealand"),
    ("PE", "Peru"),
    ("PH", "Philippines"),
    ("PK", "Pakistan"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("RU", "Russia"),
    ("RW", "Rwanda"),
    ("SA", "Saudi Arabia"),
    ("SB", "Solomon Islands"),
    ("SC", "Seychelles"),
    ("SD", "Sudan"),
    ("SE", "Sweden"),
    ("SG", "Singapore"),
    ("SI", "Slovenia"),
    ("SJ", "Svalbard & Jan Mayen"),
    ("SK", "Slovakia"),
    ("SL", "Sierra Leone"),
    ("SM", "San Marino"),
    ("SN", "Senegal"),
    ("SO", "Somalia"),
    ("SR", "Suriname"),
    ("SS", "South Sudan"),
    ("ST", "São Tomé & Príncipe"),
    ("SV", "El Salvador"),
    ("SX", "Sint Maarten"),
    ("SY", "Syria"),
    ("SZ", "Eswatini"),
    ("TA", "Tristan da Cunha"),
    ("TC", "Turks & Caicos Islands"),
    ("TD", "Chad"),
    ("TF", "French Southern Territories"),
    ("TG", "Togo"),
    ("TH", "Thailand"),
    ("TJ", "Tajikistan"),
    ("TK", "Tokelau"),
    ("TL", "Timor-Leste"),
    ("TM", "Turkmenistan"),
    ("TN", "Tunisia"),
    ("TO", "Tonga"),
    ("TR", "Turkey"),
    ("TT", "Trinidad & Tobago"),
    ("TV", "Tuvalu"),
    ("UA", "Ukraine"),
    ("UG", "Uganda"),
    ("UM", "U.S. Outlying Islands"),
    ("US", "United States"),
    ("UY", "Uruguay"),
    ("UZ", "Uzbekistan"),
    ("VA", "Vatican City"),
    ("VC", "St. Vincent & Grenadines"),
    ("VE", "Venezuela"),
    ("VG", "British Virgin Islands"),
    ("VI", "U.S. Virgin Islands"),
    ("VN", "Vietnam"),
    ("VU", "Vanuatu"),
    ("WS", "Samoa"),
    ("XK", "Kosovo"),
    ("YE", "Yemen"),
    ("YT", "Mayotte"),
    ("ZA", "South Africa"),
    ("ZM", "Zambia"),
    ("ZW", "Zimbabwe"),
];

/// Canonical form of an entity code: trimmed and ASCII upper-cased.
///
/// Every place that keys on an entity (alignment, requests, lookups) goes
/// through this so `" us"` and `"US"` name the same series.
#[must_use]
pub fn normalize_entity_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Display name for an entity code.
///
/// Unknown codes map to themselves; blank codes map to
/// [`UNKNOWN_ENTITY_LABEL`].
#[must_use]
pub fn entity_label(code: &str) -> &str {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return UNKNOWN_ENTITY_LABEL;
    }
    match ENTITY_LABELS.binary_search_by(|(known, _)| (*known).cmp(trimmed)) {
        Ok(slot) => ENTITY_LABELS[slot].1,
        Err(_) => trimmed,
    }
}

/// Returns `true` when `code` has an entry in the label table.
#[must_use]
pub fn is_known_entity(code: &str) -> bool {
    ENTITY_LABELS
        .binary_search_by(|(known, _)| (*known).cmp(code.trim()))
        .is_ok()
}

/// All `(code, display name)` pairs in code order, for selection lists.
pub fn known_entities() -> impl ExactSizeIterator<Item = (&'static str, &'static str)> {
    ENTITY_LABELS.iter().copied()
}
