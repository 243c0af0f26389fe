//! Prioritized selector candidate lists, tried lazily in order until one
//! succeeds. Hardened against drift: the lists lead with the most specific
//! selectors seen on the target site and end with broad structural fallbacks.

/// Cookie/consent banner accept buttons. Absence of a banner is a no-op.
pub const CONSENT_BUTTONS: &[&str] = &[
    "#onetrust-accept-btn-handler",
    "[data-testid='cookie-accept']",
    "button[aria-label*='Accept']",
    "button.cookie-accept",
    "button.agree-button",
];

/// Controls that open a collapsed search UI. Best-effort before the inputs.
pub const SEARCH_OPEN_BUTTONS: &[&str] = &[
    "button[aria-label='Search']",
    "button.search-toggle",
    "[role='search'] button",
];

/// Search input fields.
pub const SEARCH_INPUTS: &[&str] = &[
    "input[type='search']",
    "input[name='q']",
    "input[aria-label='Search']",
    "[role='search'] input",
];

/// First organic result link containers, most specific first.
pub const RESULT_LINKS: &[&str] = &[
    "main article h3 a",
    "main .search-results a",
    "article h2 a",
    "main a.search-result__link",
    "main li a[href]:not([href^='#'])",
];

/// Query parameter names tried for the direct-search fallback URL.
pub const DIRECT_SEARCH_PARAMS: &[&str] = &["q", "query", "search"];
