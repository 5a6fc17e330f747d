fn main() -> Result<(), Box<dyn std::error::Error>> {
    shadowcoder::cli::main()
}
