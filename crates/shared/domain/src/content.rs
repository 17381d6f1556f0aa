//! Typed site content catalog.
//!
//! All page copy lives here as plain `&'static str` records so both the
//! server (`GET /api/content`) and the web client render from one source.
//! There is no CMS; editing copy means editing this file.

use serde::Serialize;

/// Studio identity shown in the chrome and footer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Studio {
    pub name: &'static str,
    pub email: &'static str,
}

/// One navigation entry (top bar, footer columns, CTA buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

/// Landing hero copy. The accent line renders muted under the headline.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub headline: &'static str,
    pub headline_accent: &'static str,
    pub subhead: &'static str,
    pub primary_cta: NavItem,
    pub secondary_cta: NavItem,
}

/// A service offering card. `grade` is the A-D size marker on the card.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Service {
    pub key: &'static str,
    pub grade: &'static str,
    pub glyph: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub pricing: &'static str,
}

/// One step of the engagement process timeline.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProcessStep {
    pub number: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub bullets: &'static [&'static str],
}

/// A selected-work showcase entry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub tags: &'static [&'static str],
}

/// One FAQ accordion entry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FaqItem {
    pub key: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
}

/// The whole catalog, as served by the content endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SiteContent {
    pub studio: Studio,
    pub nav: &'static [NavItem],
    pub hero: Hero,
    pub services: &'static [Service],
    pub process: &'static [ProcessStep],
    pub projects: &'static [Project],
    pub faq: &'static [FaqItem],
    pub footer: Footer,
}

/// Footer link columns and legal links.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Footer {
    pub company: &'static [NavItem],
    pub services: &'static [NavItem],
    pub legal: &'static [NavItem],
}

pub const STUDIO: Studio = Studio { name: "Atelier", email: "hello@atelier.dev" };

pub const NAV_ITEMS: &[NavItem] = &[
    NavItem { label: "Services", href: "/services" },
    NavItem { label: "Work", href: "/work" },
    NavItem { label: "Process", href: "/process" },
];

/// The top-bar call to action, rendered apart from [`NAV_ITEMS`].
pub const NAV_CTA: NavItem = NavItem { label: "Get a Quote", href: "/quote" };

pub const HERO: Hero = Hero {
    headline: "We build software that",
    headline_accent: "works while you sleep.",
    subhead: "Ship fast. Build clean. Automate operations. From websites to AI workflows, \
              we create systems that remove manual work and help businesses scale.",
    primary_cta: NavItem { label: "Request a Quote", href: "/quote" },
    secondary_cta: NavItem { label: "Book a Call", href: "https://cal.com" },
};

pub const SERVICES: &[Service] = &[
    Service {
        key: "websites",
        grade: "A",
        glyph: "◈",
        title: "Launch Websites",
        description: "Marketing sites, landing pages, and portfolios that convert. \
                      Fast, responsive, and optimized for search.",
        features: &["Custom design", "Mobile-first", "SEO optimized", "CMS integration"],
        pricing: "Starting at $2.5k",
    },
    Service {
        key: "webapps",
        grade: "B",
        glyph: "◇",
        title: "Systems & Web Apps",
        description: "Portals, dashboards, and internal tools. Custom software that fits \
                      your workflow.",
        features: &["User authentication", "Database design", "API integrations", "Admin panels"],
        pricing: "Starting at $12k",
    },
    Service {
        key: "automation",
        grade: "C",
        glyph: "⬡",
        title: "Automation & AI Ops",
        description: "Remove manual work. Connect your tools, automate workflows, and let AI \
                      handle the repetitive stuff.",
        features: &["Workflow automation", "AI integrations", "Data pipelines", "Custom bots"],
        pricing: "Starting at $1.5k + monthly",
    },
    Service {
        key: "platforms",
        grade: "D",
        glyph: "⬢",
        title: "Big Builds",
        description: "Mobile apps, SaaS platforms, and complex systems. Full-scale product \
                      development.",
        features: &["Mobile apps", "SaaS platforms", "Complex integrations", "Scalable architecture"],
        pricing: "Starting at $35k",
    },
];

pub const PROCESS_STEPS: &[ProcessStep] = &[
    ProcessStep {
        number: "01",
        title: "Discovery Sprint",
        description: "We dig into your goals, constraints, and existing systems. No fluff — \
                      just the information we need to build the right thing.",
        bullets: &["Requirements gathering", "Technical assessment", "Scope definition"],
    },
    ProcessStep {
        number: "02",
        title: "Design & Plan",
        description: "We map out the architecture, design the interface, and create a clear \
                      roadmap. You see exactly what we're building before we write code.",
        bullets: &["Architecture design", "UI/UX mockups", "Project timeline"],
    },
    ProcessStep {
        number: "03",
        title: "Build",
        description: "We build in focused sprints with regular check-ins. You see progress \
                      weekly and can adjust as we go.",
        bullets: &["Agile development", "Weekly demos", "Iterative feedback"],
    },
    ProcessStep {
        number: "04",
        title: "QA & Launch",
        description: "Thorough testing, performance optimization, and a smooth deployment. \
                      We handle the technical details of going live.",
        bullets: &["Quality assurance", "Performance tuning", "Deployment"],
    },
    ProcessStep {
        number: "05",
        title: "Support",
        description: "We don't disappear after launch. Ongoing maintenance, updates, and \
                      support to keep your system running smoothly.",
        bullets: &["Bug fixes", "Feature updates", "Technical support"],
    },
];

pub const PROJECTS: &[Project] = &[
    Project {
        title: "FinanceFlow Dashboard",
        description: "A real-time financial analytics dashboard with automated reporting \
                      and AI-powered insights.",
        category: "Web App",
        tags: &["Next.js", "Supabase", "AI"],
    },
    Project {
        title: "QuickQuote Platform",
        description: "Automated quoting system that reduced proposal time by 80% for a \
                      construction company.",
        category: "Automation",
        tags: &["Workflow", "Integration", "CRM"],
    },
    Project {
        title: "Meridian Health Portal",
        description: "Patient portal with appointment scheduling, records access, and \
                      secure messaging.",
        category: "Portal",
        tags: &["Healthcare", "Auth", "HIPAA"],
    },
];

pub const FAQ_ITEMS: &[FaqItem] = &[
    FaqItem {
        key: "timeline",
        question: "How long does a typical project take?",
        answer: "It depends on scope. A marketing website typically takes 2-4 weeks. Web apps \
                 range from 6-12 weeks. Complex platforms can take 3-6 months. We'll give you \
                 a clear timeline during discovery.",
    },
    FaqItem {
        key: "pricing",
        question: "How does pricing work?",
        answer: "We work on fixed-price projects with clear milestones. You'll know the total \
                 cost upfront before we start. For ongoing work like automation maintenance, \
                 we offer monthly retainers.",
    },
    FaqItem {
        key: "process",
        question: "What's your development process?",
        answer: "We follow an agile approach with weekly check-ins and demos. You'll see \
                 progress regularly and can provide feedback throughout. No surprises at \
                 the end.",
    },
    FaqItem {
        key: "tech",
        question: "What technologies do you use?",
        answer: "We primarily work with Next.js, React, TypeScript, and Supabase for web \
                 projects. For mobile, we use React Native. Our automation stack includes \
                 n8n, Make, and custom integrations.",
    },
    FaqItem {
        key: "support",
        question: "Do you offer ongoing support?",
        answer: "Yes. After launch, we offer maintenance packages that include bug fixes, \
                 security updates, and minor feature additions. We also offer hourly support \
                 for ad-hoc requests.",
    },
    FaqItem {
        key: "ownership",
        question: "Who owns the code?",
        answer: "You do. Once the project is complete and paid for, you own all the code, \
                 designs, and assets. We can provide full documentation and handoff to your \
                 team if needed.",
    },
];

pub const FOOTER: Footer = Footer {
    company: &[
        NavItem { label: "Services", href: "/services" },
        NavItem { label: "Work", href: "/work" },
        NavItem { label: "Process", href: "/process" },
        NavItem { label: "Get a Quote", href: "/quote" },
    ],
    services: &[
        NavItem { label: "Websites", href: "/services#websites" },
        NavItem { label: "Web Apps", href: "/services#webapps" },
        NavItem { label: "Automation", href: "/services#automation" },
        NavItem { label: "Mobile & Platforms", href: "/services#platforms" },
    ],
    legal: &[
        NavItem { label: "Privacy", href: "/privacy" },
        NavItem { label: "Terms", href: "/terms" },
    ],
};

/// The complete catalog as one value.
#[must_use]
pub const fn catalog() -> SiteContent {
    SiteContent {
        studio: STUDIO,
        nav: NAV_ITEMS,
        hero: HERO,
        services: SERVICES,
        process: PROCESS_STEPS,
        projects: PROJECTS,
        faq: FAQ_ITEMS,
        footer: FOOTER,
    }
}
