use std::fmt;
use std::str::FromStr;

const RULE: &str = "--------------------------------------------------------";

const GENERIC_BODY: &str = "\
Based on the provided context, the response should accurately address the main query, incorporating relevant details and insights.
The dialogue aims to delve into the specifics of the subject matter, highlighting key points and drawing logical conclusions.
The response should integrate information from the context to construct a well-informed and coherent answer.
If certain details are not explicitly available, the response should make educated assumptions or inferences while remaining grounded in the context provided.
The answer should be concise yet informative, offering clarity and depth to the discussion.
";

const CONTEXT_AWARE_BODY: &str = "\
The response must be strictly informed by and confined to the above context, ensuring it accurately addresses the main query. It should draw exclusively on the details provided, without introducing unrelated content.
The dialogue should focus on extracting and expanding upon key elements pertinent to the subject matter, emphasizing context-driven insights and conclusions.
The answer should leverage the context to form a coherent and well-substantiated reply. If the query involves aspects not directly mentioned in the context, the response should rely on logical inferences that remain closely aligned with the provided information.
It is crucial that the response maintains relevance and avoids diverging into general or unrelated topics.
";

const CONTEXT_AND_LANGUAGE_AWARE_BODY: &str = "\
The response must be strictly informed by and confined to the above context, ensuring it accurately addresses the main query. It should draw exclusively on the details provided, without introducing unrelated content.
The dialogue should focus on extracting and expanding upon key elements pertinent to the subject matter, emphasizing context-driven insights and conclusions.
The answer should leverage the context to form a coherent and well-substantiated reply. If the query involves aspects not directly mentioned in the context, the response should rely on logical inferences that remain closely aligned with the provided information.
The response should be formatted in the same language that the query was originally submitted in to ensure clarity and relevance.
It is absolutely essential that the response strictly adheres to the provided context and does not deviate into general or unrelated topics. This is an urgent requirement.
";

const DOCUMENT_BODY: &str = "\
The response must be strictly informed by and confined to the above context, ensuring it accurately addresses the main query. It should draw exclusively on the details provided, without introducing unrelated content.
The dialogue should focus on extracting and expanding upon key elements pertinent to the subject matter, emphasizing context-driven insights and conclusions.
The answer should leverage the context to form a coherent and well-substantiated reply. If the query involves aspects not directly mentioned in the context, the response should rely on logical inferences that remain closely aligned with the provided information and should explicitly link these inferences to specific elements of the context.
The response should be formatted in the same language and style that the query was originally submitted in to ensure clarity and relevance.
It is absolutely essential that the response strictly adheres to the provided context and does not deviate into general or unrelated topics. This is an urgent requirement.
If there are gaps or missing information within the provided context, the response should either explicitly acknowledge this or make cautious, well-reasoned assumptions based on the available information.
For better readability, structure the response with appropriate paragraphs or bullet points as needed.
Answer the query as detailed as possible with all the relevant information about all the points included in the answer.
";

/// Answer-synthesis prompt variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptTemplate {
    Generic,
    ContextAware,
    ContextAndLanguageAware,
    #[default]
    Document,
}

impl PromptTemplate {
    fn header(self) -> &'static str {
        match self {
            PromptTemplate::Generic => {
                "Below is the context necessary for a comprehensive understanding of the topic."
            }
            _ => {
                "Here is the relevant context which should directly guide the generation of the response:"
            }
        }
    }

    fn body(self) -> &'static str {
        match self {
            PromptTemplate::Generic => GENERIC_BODY,
            PromptTemplate::ContextAware => CONTEXT_AWARE_BODY,
            PromptTemplate::ContextAndLanguageAware => CONTEXT_AND_LANGUAGE_AWARE_BODY,
            PromptTemplate::Document => DOCUMENT_BODY,
        }
    }

    /// Fills the template with retrieved `context` and the user's `query`.
    pub fn render(self, context: &str, query: &str) -> String {
        format!(
            "{header}\n{RULE}\n{context}\n{RULE}\n{body}Query: {query}\nAnswer: ",
            header = self.header(),
            body = self.body(),
        )
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptTemplate::Generic => "generic",
            PromptTemplate::ContextAware => "context_aware",
            PromptTemplate::ContextAndLanguageAware => "context_and_language_aware",
            PromptTemplate::Document => "document",
        };
        f.write_str(name)
    }
}

impl FromStr for PromptTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(PromptTemplate::Generic),
            "context_aware" => Ok(PromptTemplate::ContextAware),
            "context_and_language_aware" => Ok(PromptTemplate::ContextAndLanguageAware),
            "document" | "doc" => Ok(PromptTemplate::Document),
            other => Err(format!("unknown prompt template '{}'", other)),
        }
    }
}
