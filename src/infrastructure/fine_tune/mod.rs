mod openai;

pub use openai::OpenAiFineTune;
