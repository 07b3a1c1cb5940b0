//! Prompt construction for test-case generation
//!
//! The instructional template is fixed; the requirement's title and
//! description are embedded verbatim. The completion parser in
//! [`crate::parser`] is written against the Markdown shape this template
//! requests.

/// Builds the generation prompt for one requirement
pub struct PromptBuilder {
    title: String,
    description: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Build the complete generation prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(GENERATION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Requirement Title: {}\n", self.title));
        prompt.push_str(&format!("Requirement Description: {}\n\n", self.description));

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const GENERATION_INSTRUCTIONS: &str = r#"Given the following software requirement, generate a list of 3-5 clear, actionable test cases in Markdown format.
Each test case should have a bolded title describing the scenario (DO NOT include numbers in the title), and a step-by-step description.
Only the steps should be numbered.
Example:

- **Valid Complaint Code Generation**
  1. Enter valid complaint details into the tool.
  2. Click on the evaluate button.
  3. Verify that the tool generates a valid complaint code.

- **Invalid Complaint Code Generation**
  1. Enter invalid complaint details into the tool.
  2. Click on the evaluate button.
  3. Verify that the tool does not generate a complaint code."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Format:
- **[Test Case Title]**
  1. Step one
  2. Step two

Test Cases:
"#;
