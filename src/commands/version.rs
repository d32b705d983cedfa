pub fn run() {
    println!("gosweep {}", env!("BUILD_VERSION"));
    println!("Built on {}", env!("BUILD_DATE"));
}
