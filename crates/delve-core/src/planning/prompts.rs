/// System prompt for the planning step.
pub const PLANNER_SYSTEM_PROMPT: &str = "You are a planner for a research agent.";

/// Builds the user prompt for planning.
pub fn build_planner_prompt(topic: &str) -> String {
    format!(
        r#"Topic: {topic}
Now create a plan for researching this topic both from the academic research and industry perspective, give me a solid plan.

Return ONLY valid JSON. No explanations, no markdown, no extra text.
Format EXACTLY:
{{
  "plan": ["3-6 short bullet steps"],
  "tasks": [
    {{"task": "...", "tag": "research"}},
    {{"task": "...", "tag": "industry"}},
    {{"task": "...", "tag": "general"}}
  ]
}}

Rules:
- tag must be exactly one of: "research", "industry", "general"
- tasks should be parallelizable
- produce 3-6 tasks, each a self-contained search objective

The example below is ONLY to show the level of detail and structure.
Do NOT copy the example content.

Example of a plan:
1. Objective: Comprehensive history of the open web; the original 1989/1990 proposal; evolution to W3C and early web architecture; emergence of Web 1.0, Web 2.0, and the "open web" ethos.
2. Core sources from W3C, CERN, reputable histories.
3. Cover Semantic Web vision and standards (Linked Data, RDF, OWL, SPARQL, JSON-LD, schema.org).
4. Survey current trends where AI agents become primary web users: AI crawlers, content provenance (C2PA), structured data, APIs (OpenAPI, OAuth2/OIDC), federation (ActivityPub), identity (DID/VC).
5. Look for forecasts and workshops on AI agents on the web, and implications for infrastructure, interfaces, and markets.
6. Prioritize primary sources, official specs, and authoritative blogs; include recent developments."#
    )
}
