fn main() {
    arena_prowl::game::run();
}
