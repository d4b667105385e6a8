mod git;
mod installer;
