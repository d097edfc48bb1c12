//! Fixed instruction templates fed to the text model.

pub const INSTRUMENTAL_MARKER: &str = "[instrumental]";

const MUSIC_PROMPT_TEMPLATE: &str = "Reformat the following song description into a list of \
comma-separated tags for a music generation model. Use short tags covering genre, \
instruments, mood, tempo in BPM and vocal style. Respond with the tags only, on a single line, \
with no explanation.

Example input: A calm lofi hip hop track for studying, with soft piano and rain sounds
Example output: lofi, hip hop, chill, mellow piano, rain, 80 BPM, relaxing, study beats

Description: {description}";

const LYRICS_TEMPLATE: &str = "Write song lyrics for the following description. Structure \
the song with section tags such as [verse], [chorus] and [bridge], each on its own line. \
Respond with the lyrics only, without a title or any commentary.

Description: {description}";

const CATEGORY_TEMPLATE: &str = "Based on the following music description, list 3-5 relevant \
genres or categories as a comma separated list. For example Pop, Electronic, Sad, 90s. \
Description: '{description}'";

fn fill(template: &str, description: &str) -> String {
    template.replace("{description}", description)
}

pub fn music_prompt(description: &str) -> String {
    fill(MUSIC_PROMPT_TEMPLATE, description)
}

pub fn lyrics_prompt(description: &str) -> String {
    fill(LYRICS_TEMPLATE, description)
}

pub fn category_prompt(description: &str) -> String {
    fill(CATEGORY_TEMPLATE, description)
}

pub fn thumbnail_prompt(music_prompt: &str) -> String {
    format!("{}, album cover art", music_prompt)
}
