//! Output filename derivation

/// Extension given to converted playlists
const XSPF_EXTENSION: &str = "xspf";

/// Stem used when the input name has none
const FALLBACK_STEM: &str = "playlist";

/// Derive the converted file name from an uploaded or input file name
///
/// Directory components (either separator, since browsers on Windows may
/// send `C:\fakepath\...`) and the last extension are dropped.
///
/// # Examples
///
/// ```
/// use playlist_converter::utils::output_filename;
///
/// assert_eq!(output_filename("road-trip.jspf"), "road-trip.xspf");
/// assert_eq!(output_filename("C:\\fakepath\\Mix.json"), "Mix.xspf");
/// assert_eq!(output_filename(""), "playlist.xspf");
/// ```
pub fn output_filename(input_name: &str) -> String {
    let name = input_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(input_name);

    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };

    let stem = sanitize_filename(stem);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem.as_str() };
    format!("{}.{}", stem, XSPF_EXTENSION)
}

/// `Content-Disposition` value offering `file_name` as a download
///
/// `filename` carries an ASCII-only fallback and `filename*` the exact
/// UTF-8 name, percent-encoded.
///
/// # Examples
///
/// ```
/// use playlist_converter::utils::attachment_disposition;
///
/// assert_eq!(
///     attachment_disposition("Björk.xspf"),
///     "attachment; filename=\"Bj_rk.xspf\"; filename*=UTF-8''Bj%C3%B6rk.xspf"
/// );
/// ```
pub fn attachment_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

/// Make a file name safe for filesystems and for a quoted header parameter
///
/// Filesystem-unsafe characters become visually similar Unicode characters;
/// control characters become `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' => '⧸',  // U+29F8 Big Solidus
            '\\' => '⧹', // U+29F9 Big Reverse Solidus
            ':' => '꞉',  // U+A789 Modifier Letter Colon
            '*' => '⁎',  // U+204E Low Asterisk
            '?' => '？', // U+FF1F Fullwidth Question Mark
            '"' => '″',  // U+2033 Double Prime
            '<' => '‹',  // U+2039
            '>' => '›',  // U+203A
            '|' => '｜', // U+FF5C Fullwidth Vertical Line
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
