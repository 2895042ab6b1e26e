fn main() {
    punch_hell::game::run();
}
