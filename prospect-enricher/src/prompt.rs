//! The fixed research prompt sent to the completion endpoint.
//!
//! The template is parameterized only by the company domain. The example
//! payload embedded in the prompt doubles as the shape contract for
//! [`crate::profile::CompanyProfile`].

/// Model identifier sent with every completion request.
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-instruct";

/// Build the per-domain research prompt.
pub fn build_prompt(domain: &str) -> String {
    format!(
        r#"Please scrape the web and provide the latest verified information about the following company:
Website/Domain: {domain}

Company Overview: Provide a brief description of the company (up to 200 words), including: What the company does, the industry it operates in, and any recent significant developments or news related to the company
Company Type analysis: Based on available content, classify the company as either:

'Product-based': Companies that offer a platform, software, tool, or tangible product that customers can use independently (including digital platforms/apps where customers interact through the company's proprietary system)
'Service-based': Companies that primarily deliver human-performed services, consulting, or custom solutions that require direct company involvement for each customer interaction

Note: If a company offers a technology platform or software solution through which customers can self-serve or interact, it should be classified as product-based, even if there are supporting services involved.

Market Classification: Using the same sources, determine whether the company operates in: 'B2B', 'B2C', 'D2C', other relevant categories.
Industry: Using verified sources, identify the primary industry classification.

Sources: For reliable results, please ensure that the information is cross-verified against credible sources such as the company's official website, industry reports, verified news articles, LinkedIn profiles, Crunchbase, or other reputable business directories. Share the Crunchbase source that was accessed.

Return the result strictly in JSON format only, and nothing else, as shown below:
{{
"website": "Flexiple.com",
"company_overview": "Flexiple is the simplest & fastest way to build your dream tech team. Simply share your talent requirements and receive handpicked candidates in your inbox in 48 hours. Access pre-vetted quality engineers: Get direct access to Flexiple's talent who are carefully vetted over 50+ unique data points parameterized based on past work and crowdsourced from their performance on hiring processes through Flexiple.",
"company_type": "Service-based",
"company_business": "B2B",
"company_industry": "IT Consulting & IT services",
"sources": "https://www.crunchbase.com/organization/flexiple"
}}"#
    )
}
