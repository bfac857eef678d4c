//! Project generator arguments

/// Frontend stack every generated project starts with
const BASE_FLAGS: &[&str] = &["--css=tailwind", "--javascript=importmap"];

/// Frameworks skipped by `new --clean`
pub const CLEAN_MODE_FLAGS: &[&str] = &[
    "--skip-test",
    "--skip-system-test",
    "--skip-action-mailer",
    "--skip-action-mailbox",
    "--skip-action-text",
    "--skip-active-job",
    "--skip-action-cable",
    "--skip-active-storage",
    "--skip-active-record",
    "--skip-solid",
    "--skip-kamal",
    "--skip-docker",
];

/// Arguments for `rails new <project_name> ...`
pub fn rails_new_args(project_name: &str, clean: bool) -> Vec<String> {
    let mut args = vec!["new".to_string(), project_name.to_string()];
    args.extend(BASE_FLAGS.iter().map(|f| f.to_string()));
    if clean {
        args.extend(CLEAN_MODE_FLAGS.iter().map(|f| f.to_string()));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rails_new_args_default() {
        let args = rails_new_args("blog", false);
        assert_eq!(
            args,
            vec!["new", "blog", "--css=tailwind", "--javascript=importmap"]
        );
    }

    #[test]
    fn test_rails_new_args_clean_mode() {
        let args = rails_new_args("blog", true);
        assert_eq!(&args[..4], &["new", "blog", "--css=tailwind", "--javascript=importmap"]);
        assert!(args.contains(&"--skip-active-record".to_string()));
        assert_eq!(args.len(), 4 + CLEAN_MODE_FLAGS.len());
    }
}
