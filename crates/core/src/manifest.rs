//! Build-time constants shared by every agent component.

/// Name of the current cache generation.
///
/// Exactly one generation is current; buckets with any other name are stale
/// and removed when a new agent version activates.
pub const CACHE_NAME: &str = "urdu-text-editor-v1";

/// Resources pre-cached at install time, in fetch order.
///
/// Relative entries resolve against the agent scope.
pub const MANIFEST: &[&str] = &[
    "/",
    "index.html",
    "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600&family=Noto+Nastaliq+Urdu:wght@400;700&display=swap",
    "https://cdn.tailwindcss.com",
    "https://unpkg.com/lucide@latest",
    "https://cdnjs.cloudflare.com/ajax/libs/html2pdf.js/0.10.1/html2pdf.bundle.min.js",
];
