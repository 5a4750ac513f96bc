use ytloop::error::AppResult;

fn main() -> AppResult<()> {
    ytloop::entry::run()
}
