//! Projects listed on the portfolio page.

use portfolio_core::{Project, ProjectId};

fn project(
    id: u32,
    title: &str,
    description: &str,
    image_url: &str,
    technologies: &[&str],
    github_link: &str,
) -> Project {
    Project {
        id: ProjectId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        image_url: image_url.to_string(),
        technologies: technologies.iter().map(|t| (*t).to_string()).collect(),
        live_link: None,
        github_link: Some(github_link.to_string()),
    }
}

/// The fixed project list, in display order.
#[must_use]
pub fn featured_projects() -> Vec<Project> {
    vec![
        project(
            1,
            "First-year web development capstone",
            "A pair project: a Java program that records a student's personal details and \
             grades and stores them in a relational database.",
            "https://via.placeholder.com/400x250?text=Capstone",
            &["Java", "MySQL"],
            "https://github.com/nenosfc/TrabajoGrupal",
        ),
        project(
            2,
            "Minecraft fan site",
            "A website covering the different aspects of the game.",
            "https://via.placeholder.com/400x250?text=Minecraft",
            &["HTML", "CSS", "JavaScript"],
            "https://github.com/emh0009-create/Pagina-Web",
        ),
        project(
            3,
            "Professional portfolio",
            "This site: who I am, what I have built, and how to get in touch.",
            "https://via.placeholder.com/400x250?text=Portfolio",
            &["Rust", "Axum", "Askama", "HTML", "CSS"],
            "https://github.com/example/portfolio",
        ),
    ]
}
