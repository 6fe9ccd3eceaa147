/// Build the completion prompt for `count` titles over `content`.
///
/// `language` is the detected content language; when present the model is
/// asked to answer in it rather than defaulting to English.
pub fn build_prompt(content: &str, count: usize, language: Option<&str>) -> String {
    let language_line = match language {
        Some(language) => format!("Write the titles in {language}, the language of the blog post.\n"),
        None => String::new(),
    };

    format!(
        "I want you to act as a professional blog titles generator.\n\
         Think of titles that are SEO optimized and attention-grabbing at the same time, \
         and will encourage people to click and read the blog post.\n\
         Generate exactly {count} titles as a numbered list, one title per line, \
         in the form \"1. Title\".\n\
         {language_line}\
         Do not add any introduction, explanation or commentary.\n\
         ---\n\
         My blog post is about the following content:\n\
         {content}\n\
         ---\n"
    )
}
