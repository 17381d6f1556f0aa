fn main() {
    atelier_site::launch();
}
