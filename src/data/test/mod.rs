mod lfg;
