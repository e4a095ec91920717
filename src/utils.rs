use indicatif::ProgressStyle;

pub fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "[{elapsed_precise}] {human_pos}/{human_len} {percent}% ({per_sec})",
    )
    .expect("hardcoded")
}
