mod dispatch;
mod document;
mod numbering;
mod references;
