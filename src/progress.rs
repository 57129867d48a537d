use std::io::{self, Write};

/// Progress over the club/player loop. Purely cosmetic.
pub trait Progress {
    /// Number of clubs that will be scraped.
    fn begin(&mut self, _clubs: usize) {}

    /// A club page was parsed; `players` profiles follow.
    fn club_started(&mut self, _index: usize, _name: &str, _players: usize) {}

    /// One player of the current club is done.
    fn player_done(&mut self, _done: usize) {}

    /// Something else is about to print; get off the current line.
    fn interrupt(&mut self) {}

    /// Called once at the end, successful or not.
    fn finish(&mut self) {}
}

/// No-op sink for `--quiet`.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Single self-overwriting status line on stderr.
pub struct ConsoleProgress<W: Write = io::Stderr> {
    out: W,
    clubs: usize,
    club_index: usize,
    club_name: String,
    players: usize,
    active: bool,
}

impl ConsoleProgress {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clubs: 0,
            club_index: 0,
            club_name: String::new(),
            players: 0,
            active: false,
        }
    }

    fn draw(&mut self, done: usize) {
        let _ = write!(
            self.out,
            "\r[{}/{}] {}: {}/{} players",
            self.club_index + 1,
            self.clubs,
            self.club_name,
            done,
            self.players
        );
        let _ = self.out.flush();
        self.active = true;
    }

    fn end_line(&mut self) {
        if self.active {
            let _ = writeln!(self.out);
            self.active = false;
        }
    }
}

impl<W: Write> Progress for ConsoleProgress<W> {
    fn begin(&mut self, clubs: usize) {
        self.clubs = clubs;
    }

    fn club_started(&mut self, index: usize, name: &str, players: usize) {
        self.end_line();
        self.club_index = index;
        self.club_name = name.to_string();
        self.players = players;
        self.draw(0);
    }

    fn player_done(&mut self, done: usize) {
        self.draw(done);
    }

    fn interrupt(&mut self) {
        self.end_line();
    }

    fn finish(&mut self) {
        self.end_line();
    }
}
