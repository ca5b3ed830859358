use askama::Template;

use super::PublicContext;

/// Where the dormitory is, as shown in the landing page's location section.
pub struct Location {
    pub campus: &'static str,
    pub address: &'static str,
    pub email: &'static str,
    pub map_src: &'static str,
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub page: PublicContext,
    pub highlights: Vec<&'static str>,
    pub features: Vec<(&'static str, &'static str)>,
    pub location: Location,
    pub year: i32,
}
