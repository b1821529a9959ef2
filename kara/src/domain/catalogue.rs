//! The fixed catalogue of UI/UX topics

use super::Topic;

const ENTRIES: &[(u32, &str, &str)] = &[
    (
        1,
        "User Research & Persona Definition",
        "Understand your target audience deeply. Who are they, what are their goals, and what are their pain points? Develop detailed user personas to guide all design and development decisions.",
    ),
    (
        2,
        "Information Architecture & User Flows",
        "Structure your application's content and navigation logically. Design intuitive user flows that guide users to their goals with minimal friction and maximum clarity.",
    ),
    (
        3,
        "Wireframing & Prototyping",
        "Create low-fidelity wireframes to outline the structure and layout. Build interactive prototypes to test user flows and gather early feedback before writing any code.",
    ),
    (
        4,
        "Visual Design & Design Systems",
        "Establish a cohesive visual identity. Define color palettes, typography, iconography, and component styles. Create a design system for consistency and scalability.",
    ),
    (
        5,
        "Accessibility (A11y)",
        "Ensure your application is usable by everyone, including people with disabilities. Implement ARIA attributes, ensure keyboard navigability, and maintain sufficient color contrast.",
    ),
    (
        6,
        "Frontend Technology Stack",
        "Choose the right tools for the job. Select a framework (e.g., React, Vue, Svelte), state management library, and styling solution that fits your project's scale and requirements.",
    ),
    (
        7,
        "Performance Optimization",
        "Build a fast and responsive application. Optimize asset loading, implement efficient rendering strategies, and minimize bundle size to ensure a smooth user experience on all devices.",
    ),
    (
        8,
        "Testing & User Feedback Loops",
        "Implement a robust testing strategy, including unit, integration, and end-to-end tests. Establish channels for continuous user feedback to iterate and improve the application post-launch.",
    ),
    (
        9,
        "Component-Driven Development",
        "Build UIs with isolated, reusable components. Utilize tools like Storybook to develop, test, and document components in isolation, accelerating development and ensuring consistency.",
    ),
    (
        10,
        "Micro-interactions & Animation",
        "Enhance user experience with purposeful animations. Design subtle, feedback-driven micro-interactions that guide users, provide delight, and make the interface feel more responsive.",
    ),
    (
        11,
        "API Integration & Data Management",
        "Architect robust data fetching strategies. Choose between REST or GraphQL, and implement client-side caching with tools like React Query or SWR to create a fast, resilient application.",
    ),
    (
        12,
        "A/B Testing & Iteration",
        "Make data-driven design decisions. Set up A/B tests to validate hypotheses, measure the impact of changes, and continuously iterate on the user experience based on real-world usage data.",
    ),
];

/// All catalogue topics in display order
pub fn topics() -> Vec<Topic> {
    ENTRIES
        .iter()
        .map(|(ordinal, title, description)| Topic::catalogued(*ordinal, *title, *description))
        .collect()
}

/// Look up a catalogue topic by its ordinal
pub fn by_ordinal(ordinal: u32) -> Option<Topic> {
    ENTRIES
        .iter()
        .find(|(o, _, _)| *o == ordinal)
        .map(|(o, title, description)| Topic::catalogued(*o, *title, *description))
}
