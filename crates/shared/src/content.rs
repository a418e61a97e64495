//! Read-only reference data behind the About, Skills, Experience and Projects
//! pages.

use crate::domain::{
    AccentColor, Education, Experience, Project, ProjectCategory, Skill, SkillCategory, SocialLink,
};
use crate::protocol::ContentBundle;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn skills() -> Vec<Skill> {
    use AccentColor::{Cyan, Lime, Pink};
    use SkillCategory::{Backend, Frontend, Tools};

    [
        ("React", 95, Frontend, Cyan),
        ("TypeScript", 90, Frontend, Cyan),
        ("Next.js", 88, Frontend, Pink),
        ("Three.js", 75, Frontend, Lime),
        ("Node.js", 85, Backend, Lime),
        ("Python", 80, Backend, Cyan),
        ("PostgreSQL", 78, Backend, Pink),
        ("Docker", 72, Tools, Cyan),
        ("AWS", 70, Tools, Lime),
        ("Git", 92, Tools, Pink),
        ("Figma", 68, Tools, Cyan),
        ("GraphQL", 75, Backend, Lime),
    ]
    .into_iter()
    .map(|(name, level, category, color)| Skill {
        name: name.to_string(),
        level,
        category,
        color,
    })
    .collect()
}

pub fn skills_in(category: SkillCategory) -> Vec<Skill> {
    skills()
        .into_iter()
        .filter(|skill| skill.category == category)
        .collect()
}

pub fn experiences() -> Vec<Experience> {
    vec![
        Experience {
            id: "1".into(),
            company: "TechCorp Innovation".into(),
            role: "Senior Frontend Developer".into(),
            duration: "2022 - Present".into(),
            description: "Leading frontend architecture for enterprise SaaS platform. Built component library used across 5 product teams. Reduced bundle size by 40% through code splitting and lazy loading.".into(),
            technologies: strings(&["React", "TypeScript", "Next.js", "GraphQL", "Tailwind"]),
        },
        Experience {
            id: "2".into(),
            company: "StartupX Labs".into(),
            role: "Full Stack Developer".into(),
            duration: "2020 - 2022".into(),
            description: "Developed real-time collaboration features for project management tool. Implemented WebSocket-based live updates and offline-first architecture.".into(),
            technologies: strings(&["React", "Node.js", "PostgreSQL", "Redis", "Docker"]),
        },
        Experience {
            id: "3".into(),
            company: "Digital Agency Co".into(),
            role: "Frontend Developer".into(),
            duration: "2018 - 2020".into(),
            description: "Created interactive web experiences for Fortune 500 clients. Specialized in animation and 3D web graphics using Three.js and WebGL.".into(),
            technologies: strings(&["JavaScript", "Three.js", "GSAP", "WebGL", "CSS"]),
        },
    ]
}

pub fn education() -> Vec<Education> {
    vec![
        Education {
            id: "1".into(),
            institution: "University of Technology".into(),
            degree: "M.S. Computer Science".into(),
            duration: "2016 - 2018".into(),
            description: "Specialized in Human-Computer Interaction and Computer Graphics. Thesis on real-time 3D rendering optimization.".into(),
        },
        Education {
            id: "2".into(),
            institution: "State University".into(),
            degree: "B.S. Software Engineering".into(),
            duration: "2012 - 2016".into(),
            description: "Graduated with honors. Focus on web technologies and distributed systems.".into(),
        },
    ]
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".into(),
            title: "NeonFlow Dashboard".into(),
            description: "Real-time analytics dashboard with 3D data visualizations".into(),
            long_description: "A cutting-edge analytics platform featuring real-time data streaming, interactive 3D charts built with Three.js, and a dark-themed UI designed for data analysts who work in low-light environments.".into(),
            technologies: strings(&["React", "Three.js", "D3.js", "WebSocket", "Node.js"]),
            category: ProjectCategory::Web,
            image_url: "/placeholder-project-1.png".into(),
            live_url: Some("https://example.com".into()),
            github_url: Some("https://github.com".into()),
            featured: true,
        },
        Project {
            id: "2".into(),
            title: "SynthWave Audio".into(),
            description: "Web-based synthesizer with visual audio feedback".into(),
            long_description: "A browser-based digital audio workstation with real-time waveform visualization, MIDI support, and a retrowave-inspired interface. Features include oscillators, filters, and effects chains.".into(),
            technologies: strings(&["TypeScript", "Web Audio API", "Canvas", "React"]),
            category: ProjectCategory::Web,
            image_url: "/placeholder-project-2.png".into(),
            live_url: Some("https://example.com".into()),
            github_url: Some("https://github.com".into()),
            featured: true,
        },
        Project {
            id: "3".into(),
            title: "CryptoTracker AI".into(),
            description: "ML-powered cryptocurrency portfolio manager".into(),
            long_description: "An intelligent portfolio management tool that uses machine learning to analyze market trends and suggest optimal trading strategies. Features include price predictions, risk assessment, and automated alerts.".into(),
            technologies: strings(&["Python", "TensorFlow", "React", "FastAPI", "PostgreSQL"]),
            category: ProjectCategory::Ai,
            image_url: "/placeholder-project-3.png".into(),
            live_url: None,
            github_url: Some("https://github.com".into()),
            featured: true,
        },
    ]
}

pub fn featured_projects() -> Vec<Project> {
    projects()
        .into_iter()
        .filter(|project| project.featured)
        .collect()
}

pub fn social_links() -> Vec<SocialLink> {
    [
        ("GitHub", "https://github.com", "github"),
        ("LinkedIn", "https://linkedin.com", "linkedin"),
        ("Twitter", "https://twitter.com", "twitter"),
    ]
    .into_iter()
    .map(|(platform, url, icon)| SocialLink {
        platform: platform.to_string(),
        url: url.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}

pub fn bundle() -> ContentBundle {
    ContentBundle {
        skills: skills(),
        experiences: experiences(),
        education: education(),
        projects: projects(),
        social_links: social_links(),
    }
}
