use geni_types::{FeedbackRecord, Shape};

/// Builds generation prompts. Pure and deterministic.
pub struct PromptBuilder;

impl PromptBuilder {
    /// First-attempt prompt.
    pub fn build_prompt(description: &str, inputs: &[Shape], output: &Shape) -> String {
        let mut prompt = String::from("\n");
        prompt.push_str(INSTRUCTION_BLOCK);
        prompt.push_str(
            "Generate a single function with the following description, inputs and output schema:\n",
        );
        prompt.push_str(&signature_block(description, inputs, output));
        prompt
    }

    /// Retry prompt: the first-attempt prompt, the instructions again, every
    /// failed attempt in order, then the request restated.
    pub fn build_retry_prompt(
        description: &str,
        inputs: &[Shape],
        output: &Shape,
        feedback: &[FeedbackRecord],
    ) -> String {
        let attempts = feedback
            .iter()
            .map(|record| {
                format!(
                    "For the response: {}, the error was: {}",
                    record.source, record.diagnostic
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut prompt = Self::build_prompt(description, inputs, output);
        prompt.push('\n');
        prompt.push_str(INSTRUCTION_BLOCK);
        prompt.push('\n');
        prompt.push_str(&attempts);
        prompt.push_str("\n\n");
        prompt.push_str(
            "Please retry and generate a single function with the following description, \
             inputs and output schema:\n",
        );
        prompt.push_str(&signature_block(description, inputs, output));
        prompt
    }
}

fn signature_block(description: &str, inputs: &[Shape], output: &Shape) -> String {
    let inputs = inputs
        .iter()
        .map(Shape::descriptor)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "description: {}\ninputs: {}\noutput: {}\n",
        description,
        inputs,
        output.descriptor()
    )
}

const INSTRUCTION_BLOCK: &str = "\
Generate a fully typed typescript function based on the given description, input schema and output schema to be passed into eval function.
Example:

description: 'Return a happy birthday message to the person mentioning the age.' 
input: { readonly name: string; readonly age: number }
output: string

function main(person: { readonly name: string; readonly age: number }): string {
return `Happy birthday ${person.name}. You're now ${person.age} years old`
}


Make sure the function is called 'main'. 
Make sure the response is in a text format.Not a code block.
";
