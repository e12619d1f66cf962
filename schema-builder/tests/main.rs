mod closure;
