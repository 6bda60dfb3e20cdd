//! `TCON` genre grammar.
//!
//! ID3v2.3 packs genres as a list of either bare numeric ID3v1 genre codes
//! wrapped in parentheses, `(CR)`/`(RX)` refinement codes, a literal `((` escape,
//! or free text, all concatenated with no separator. ID3v2.4 instead NUL-separates
//! already-resolved strings, some of which may still be bare numeric codes left
//! over from a v2.3 conversion. [`decode`] handles both by treating its input as
//! the list of already-NUL-split strings and re-expanding any parenthesized
//! content it finds inside each one.

/// The 192-entry extended ID3v1 genre table, indexed by genre code.
pub const GENRES: &[&str] = &[
    "Blues",
    "Classic Rock",
    "Country",
    "Dance",
    "Disco",
    "Funk",
    "Grunge",
    "Hip-Hop",
    "Jazz",
    "Metal",
    "New Age",
    "Oldies",
    "Other",
    "Pop",
    "R&B",
    "Rap",
    "Reggae",
    "Rock",
    "Techno",
    "Industrial",
    "Alternative",
    "Ska",
    "Death Metal",
    "Pranks",
    "Soundtrack",
    "Euro-Techno",
    "Ambient",
    "Trip-Hop",
    "Vocal",
    "Jazz+Funk",
    "Fusion",
    "Trance",
    "Classical",
    "Instrumental",
    "Acid",
    "House",
    "Game",
    "Sound Clip",
    "Gospel",
    "Noise",
    "AlternRock",
    "Bass",
    "Soul",
    "Punk",
    "Space",
    "Meditative",
    "Instrumental Pop",
    "Instrumental Rock",
    "Ethnic",
    "Gothic",
    "Darkwave",
    "Techno-Industrial",
    "Electronic",
    "Pop-Folk",
    "Eurodance",
    "Dream",
    "Southern Rock",
    "Comedy",
    "Cult",
    "Gangsta",
    "Top 40",
    "Christian Rap",
    "Pop/Funk",
    "Jungle",
    "Native American",
    "Cabaret",
    "New Wave",
    "Psychedelic",
    "Rave",
    "Showtunes",
    "Trailer",
    "Lo-Fi",
    "Tribal",
    "Acid Punk",
    "Acid Jazz",
    "Polka",
    "Retro",
    "Musical",
    "Rock & Roll",
    "Hard Rock",
    "Folk",
    "Folk-Rock",
    "National Folk",
    "Swing",
    "Fast Fusion",
    "Bebop",
    "Latin",
    "Revival",
    "Celtic",
    "Bluegrass",
    "Avantgarde",
    "Gothic Rock",
    "Progressive Rock",
    "Psychedelic Rock",
    "Symphonic Rock",
    "Slow Rock",
    "Big Band",
    "Chorus",
    "Easy Listening",
    "Acoustic",
    "Humour",
    "Speech",
    "Chanson",
    "Opera",
    "Chamber Music",
    "Sonata",
    "Symphony",
    "Booty Bass",
    "Primus",
    "Porn Groove",
    "Satire",
    "Slow Jam",
    "Club",
    "Tango",
    "Samba",
    "Folklore",
    "Ballad",
    "Power Ballad",
    "Rhythmic Soul",
    "Freestyle",
    "Duet",
    "Punk Rock",
    "Drum Solo",
    "A Cappella",
    "Euro-House",
    "Dance Hall",
    "Goa",
    "Drum & Bass",
    "Club-House",
    "Hardcore",
    "Terror",
    "Indie",
    "BritPop",
    "Afro-Punk",
    "Polsk Punk",
    "Beat",
    "Christian Gangsta Rap",
    "Heavy Metal",
    "Black Metal",
    "Crossover",
    "Contemporary Christian",
    "Christian Rock",
    "Merengue",
    "Salsa",
    "Thrash Metal",
    "Anime",
    "JPop",
    "Synthpop",
    "Abstract",
    "Art Rock",
    "Baroque",
    "Bhangra",
    "Big Beat",
    "Breakbeat",
    "Chillout",
    "Downtempo",
    "Dub",
    "EBM",
    "Eclectic",
    "Electro",
    "Electroclash",
    "Emo",
    "Experimental",
    "Garage",
    "Global",
    "IDM",
    "Illbient",
    "Industro-Goth",
    "Jam Band",
    "Krautrock",
    "Leftfield",
    "Lounge",
    "Math Rock",
    "New Romantic",
    "Nu-Breakz",
    "Post-Punk",
    "Post-Rock",
    "Psytrance",
    "Shoegaze",
    "Space Rock",
    "Trop Rock",
    "World Music",
    "Neoclassical",
    "Audiobook",
    "Audio Theatre",
    "Neue Deutsche Welle",
    "Podcast",
    "Indie-Rock",
    "G-Funk",
    "Dubstep",
    "Garage Rock",
    "Psybient",
];

/// Looks up a genre name by its ID3v1 code.
pub fn name_for_code(code: u16) -> Option<&'static str> {
    GENRES.get(code as usize).copied()
}

/// Finds the ID3v1 code for a genre name, case-sensitively.
pub fn code_for_name(name: &str) -> Option<u16> {
    GENRES.iter().position(|&g| g == name).map(|i| i as u16)
}

/// Expands the raw `TCON` value list into display genre names, resolving
/// parenthesized numeric codes and the `(CR)`/`(RX)` refinement markers.
///
/// Each entry of `raw` is scanned independently; a parenthesized run at the
/// very start of an entry is expanded into zero or more genre names, followed
/// by whatever free text trails it (itself kept as its own genre, if any).
pub fn decode(raw: &[String]) -> Vec<String> {
    let mut out = Vec::new();

    for entry in raw {
        out.extend(decode_entry(entry));
    }

    out
}

fn decode_entry(entry: &str) -> Vec<String> {
    if let Some(tail) = entry.strip_prefix("((") {
        // Literal "(" escape: the rest of the entry is free text starting
        // with a paren.
        return vec![format!("({}", tail)];
    }

    // A bare integer entry (no parens at all) is also a GENRES index, the
    // same as a parenthesized one; out-of-range codes become "Unknown"
    // rather than being dropped, since the entry was clearly meant as a code.
    if let Ok(n) = entry.parse::<u16>() {
        return vec![name_for_code(n).unwrap_or("Unknown").to_string()];
    }

    let mut out = Vec::new();
    let mut rest = entry;

    loop {
        if !rest.starts_with('(') {
            break;
        }

        let close = match rest.find(')') {
            Some(idx) => idx,
            None => break,
        };

        let code = &rest[1..close];

        match code {
            "CR" => out.push("Cover".to_string()),
            "RX" => out.push("Remix".to_string()),
            _ => match code.parse::<u16>() {
                Ok(n) => out.push(name_for_code(n).unwrap_or("Unknown").to_string()),
                Err(_) => break,
            },
        }

        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        out.push(rest.to_string());
    } else if out.is_empty() && !entry.is_empty() {
        out.push(entry.to_string());
    }

    out
}

/// Re-encodes genre names back into the parenthesized-numeric form where a
/// matching code exists, falling back to the bare name otherwise. Each input
/// genre becomes its own entry in the returned list (ready to be NUL-joined by
/// an `EncodedTextSpec`-style multi-value writer).
pub fn encode(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| match code_for_name(name) {
            Some(code) => format!("({})", code),
            None => name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_indices_match_known_codes() {
        assert_eq!(GENRES[20], "Alternative");
        assert_eq!(GENRES[51], "Techno-Industrial");
        assert_eq!(GENRES.len(), 192);
    }

    #[test]
    fn mixed_grammar_entry() {
        let raw = vec!["(20)(CR)\u{0}30\u{0}\u{0}Another\u{0}(51)Hooray".to_string()];
        // The embedded NULs are a stand-in for what the caller already split
        // out; decode() only has to handle the parenthesized grammar within
        // a single already-delimited entry.
        let entries: Vec<String> = raw[0].split('\u{0}').map(str::to_string).collect();
        let decoded = decode(&entries);
        assert_eq!(
            decoded,
            vec!["Alternative", "Cover", "Fusion", "Another", "Techno-Industrial", "Hooray"]
        );
    }

    #[test]
    fn bare_numeric_string() {
        assert_eq!(decode(&["17".to_string()]), vec!["Rock".to_string()]);
    }

    #[test]
    fn literal_double_paren_is_escaped() {
        assert_eq!(
            decode(&["((Not a code)".to_string()]),
            vec!["(Not a code)".to_string()]
        );
    }

    #[test]
    fn unknown_code_becomes_unknown() {
        assert_eq!(decode(&["(255)".to_string()]), vec!["Unknown".to_string()]);
    }

    #[test]
    fn free_text_passes_through() {
        assert_eq!(decode(&["Math Rock".to_string()]), vec!["Math Rock".to_string()]);
    }

    #[test]
    fn encode_prefers_numeric_code() {
        assert_eq!(encode(&["Ska".to_string()]), vec!["(21)".to_string()]);
        assert_eq!(encode(&["Not A Genre".to_string()]), vec!["Not A Genre".to_string()]);
    }
}
