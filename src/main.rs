fn main() {
    env_logger::init();
    spots::default().run();
}
