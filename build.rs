fn main() {
    // version, git and target information for `infmax --version`
    built::write_built_file().expect("Failed to acquire build-time information");
}
